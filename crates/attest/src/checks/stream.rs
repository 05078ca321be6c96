//! Observable adapter over the task-based checks client.
//!
//! The core client exposes plain `async` operations; this module layers the
//! stream-based calling convention on top. Single-result operations become
//! one-element streams, and listings become lazy streams that fetch the next
//! page only when the consumer polls past the current one. No retry,
//! timeout, or backpressure policy lives here.

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use super::client::{ChecksClient, next_page};
use super::types::{CheckAnnotation, CheckRun, CheckRunFilter, CheckRunUpdate, NewCheckRun};
use crate::address::RepoAddress;
use crate::error::{Error, Result};

/// Stream-based view of a [`ChecksClient`].
#[derive(Clone)]
pub struct ObservableChecksClient {
    inner: ChecksClient,
}

impl ObservableChecksClient {
    /// Wrap a task-based client.
    pub fn new(inner: ChecksClient) -> Self {
        Self { inner }
    }

    /// Get the wrapped task-based client.
    pub fn inner(&self) -> &ChecksClient {
        &self.inner
    }

    /// Unwrap back into the task-based client.
    pub fn into_inner(self) -> ChecksClient {
        self.inner
    }

    /// Create a check run; yields the created run once.
    pub fn create<'a>(
        &'a self,
        repo: &'a RepoAddress,
        new_run: &'a NewCheckRun,
    ) -> BoxStream<'a, Result<CheckRun>> {
        stream::once(self.inner.create(repo, new_run)).boxed()
    }

    /// Apply a partial update; yields the merged run once.
    pub fn update<'a>(
        &'a self,
        repo: &'a RepoAddress,
        check_run_id: u64,
        update: &'a CheckRunUpdate,
    ) -> BoxStream<'a, Result<CheckRun>> {
        stream::once(self.inner.update(repo, check_run_id, update)).boxed()
    }

    /// Fetch a single run by id; yields it once.
    pub fn get<'a>(
        &'a self,
        repo: &'a RepoAddress,
        check_run_id: u64,
    ) -> BoxStream<'a, Result<CheckRun>> {
        stream::once(self.inner.get(repo, check_run_id)).boxed()
    }

    /// Check runs for a commit-ish reference, one item at a time.
    ///
    /// Pages are fetched on demand: page N+1 is requested only after the
    /// consumer has drained page N.
    pub fn for_reference<'a>(
        &'a self,
        repo: &'a RepoAddress,
        git_ref: &'a str,
        filter: &'a CheckRunFilter,
    ) -> BoxStream<'a, Result<CheckRun>> {
        stream::try_unfold(Some(1u32), move |state| async move {
            let Some(page) = state else {
                return Ok::<_, Error>(None);
            };
            let (list, info) = self
                .inner
                .list_for_reference_page(repo, git_ref, filter, page)
                .await?;
            let next = next_page(page, list.check_runs.len(), &info);
            let items = stream::iter(list.check_runs.into_iter().map(Ok::<CheckRun, Error>));
            Ok(Some((items, next)))
        })
        .try_flatten()
        .boxed()
    }

    /// Check runs in a check suite, one item at a time.
    pub fn for_suite<'a>(
        &'a self,
        repo: &'a RepoAddress,
        check_suite_id: u64,
        filter: &'a CheckRunFilter,
    ) -> BoxStream<'a, Result<CheckRun>> {
        stream::try_unfold(Some(1u32), move |state| async move {
            let Some(page) = state else {
                return Ok::<_, Error>(None);
            };
            let (list, info) = self
                .inner
                .list_for_suite_page(repo, check_suite_id, filter, page)
                .await?;
            let next = next_page(page, list.check_runs.len(), &info);
            let items = stream::iter(list.check_runs.into_iter().map(Ok::<CheckRun, Error>));
            Ok(Some((items, next)))
        })
        .try_flatten()
        .boxed()
    }

    /// Annotations attached to a check run, one item at a time.
    pub fn annotations<'a>(
        &'a self,
        repo: &'a RepoAddress,
        check_run_id: u64,
    ) -> BoxStream<'a, Result<CheckAnnotation>> {
        stream::try_unfold(Some(1u32), move |state| async move {
            let Some(page) = state else {
                return Ok::<_, Error>(None);
            };
            let (annotations, info) = self
                .inner
                .list_annotations_page(repo, check_run_id, page)
                .await?;
            let next = next_page(page, annotations.len(), &info);
            let items = stream::iter(annotations.into_iter().map(Ok::<CheckAnnotation, Error>));
            Ok(Some((items, next)))
        })
        .try_flatten()
        .boxed()
    }
}

impl From<ChecksClient> for ObservableChecksClient {
    fn from(inner: ChecksClient) -> Self {
        Self::new(inner)
    }
}
