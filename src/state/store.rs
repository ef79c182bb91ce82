/// The ImageStore owns the batch of images for the session.
///
/// It is the single writer for the list: every mutation goes through one of
/// the methods below, and the UI layer only reads. Items keep their
/// insertion order.

use super::data::{ImageStatus, ProcessedImage};

/// Everything a naming request needs for one item, snapshotted at the
/// moment the batch starts so later list mutations cannot affect it.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub id: String,
    pub base64: String,
    pub mime_type: String,
}

/// Outcome of one naming request: the suggested name, or a
/// user-facing error message.
pub type NameOutcome = Result<String, String>;

#[derive(Debug, Default)]
pub struct ImageStore {
    images: Vec<ProcessedImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the batch, in insertion order
    pub fn images(&self) -> &[ProcessedImage] {
        &self.images
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Append a newly ingested image. No deduplication: the same file
    /// added twice yields two independent entries with different ids.
    pub fn enqueue(&mut self, image: ProcessedImage) {
        self.images.push(image);
    }

    /// Append a whole ingest batch in one update
    pub fn extend(&mut self, images: Vec<ProcessedImage>) {
        for image in images {
            self.enqueue(image);
        }
    }

    pub fn has_queued(&self) -> bool {
        self.images
            .iter()
            .any(|image| image.status == ImageStatus::Queued)
    }

    pub fn has_completed(&self) -> bool {
        self.images
            .iter()
            .any(|image| matches!(image.status, ImageStatus::Completed { .. }))
    }

    /// Snapshot every queued item and flip it to Generating in one
    /// mutation, so the view shows the whole batch as in-flight before any
    /// network call resolves. Returns the jobs in list order; empty if
    /// nothing was queued.
    pub fn begin_generation(&mut self) -> Vec<GenerationJob> {
        let mut jobs = Vec::new();
        for image in &mut self.images {
            if image.status == ImageStatus::Queued {
                image.status = ImageStatus::Generating;
                jobs.push(GenerationJob {
                    id: image.id.clone(),
                    base64: image.base64.clone(),
                    mime_type: image.mime_type.clone(),
                });
            }
        }
        jobs
    }

    /// Apply one naming result to the matching item.
    ///
    /// Only items currently Generating accept an outcome; anything else
    /// (removed item, stale result after a clear) is dropped.
    pub fn apply_outcome(&mut self, id: &str, outcome: NameOutcome) {
        let Some(image) = self
            .images
            .iter_mut()
            .find(|image| image.id == id && image.status == ImageStatus::Generating)
        else {
            log::debug!("dropping naming result for unknown or settled item {}", id);
            return;
        };

        image.status = match outcome {
            Ok(suggested_name) => ImageStatus::Completed { suggested_name },
            Err(message) => ImageStatus::Error { message },
        };
    }

    /// Delete a single item by id, whatever its status.
    /// Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) {
        self.images.retain(|image| image.id != id);
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Look up one item by id
    pub fn get(&self, id: &str) -> Option<&ProcessedImage> {
        self.images.iter().find(|image| image.id == id)
    }

    /// Newline-joined `name: suggested_name` listing of every completed
    /// item, for the copy-all action
    pub fn completed_listing(&self) -> String {
        self.images
            .iter()
            .filter_map(|image| {
                image
                    .suggested_name()
                    .map(|suggested| format!("{}: {}", image.name, suggested))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued(name: &str) -> ProcessedImage {
        ProcessedImage::new("aGk=".into(), "image/png".into(), name.into())
    }

    #[test]
    fn test_enqueue_keeps_insertion_order() {
        let mut store = ImageStore::new();
        store.enqueue(queued("a.png"));
        store.enqueue(queued("b.png"));
        store.enqueue(queued("c.png"));

        let names: Vec<&str> = store.images().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_same_content_twice_yields_independent_entries() {
        let mut store = ImageStore::new();
        store.enqueue(queued("cat.jpg"));
        store.enqueue(queued("cat.jpg"));

        assert_eq!(store.images().len(), 2);
        assert_ne!(store.images()[0].id, store.images()[1].id);
    }

    #[test]
    fn test_begin_generation_flips_all_queued_and_snapshots_content() {
        let mut store = ImageStore::new();
        store.enqueue(queued("a.png"));
        let mut done = queued("b.png");
        done.status = ImageStatus::Completed {
            suggested_name: "Dawn".into(),
        };
        store.enqueue(done);
        store.enqueue(queued("c.png"));

        let jobs = store.begin_generation();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, store.images()[0].id);
        assert_eq!(jobs[1].id, store.images()[2].id);
        assert_eq!(jobs[0].base64, "aGk=");
        assert_eq!(jobs[0].mime_type, "image/png");
        assert_eq!(store.images()[0].status, ImageStatus::Generating);
        assert_eq!(store.images()[2].status, ImageStatus::Generating);
        // Already-settled item untouched
        assert!(matches!(
            store.images()[1].status,
            ImageStatus::Completed { .. }
        ));
    }

    #[test]
    fn test_begin_generation_with_nothing_queued_is_a_noop() {
        let mut store = ImageStore::new();
        assert!(store.begin_generation().is_empty());

        let mut errored = queued("a.png");
        errored.status = ImageStatus::Error {
            message: "nope".into(),
        };
        store.enqueue(errored);

        assert!(store.begin_generation().is_empty());
        assert!(matches!(store.images()[0].status, ImageStatus::Error { .. }));
    }

    #[test]
    fn test_apply_outcome_sets_terminal_states() {
        let mut store = ImageStore::new();
        store.enqueue(queued("a.png"));
        store.enqueue(queued("b.png"));
        let jobs = store.begin_generation();

        store.apply_outcome(&jobs[0].id, Ok("Dawn".into()));
        store.apply_outcome(&jobs[1].id, Err("service unavailable".into()));

        assert_eq!(
            store.images()[0].status,
            ImageStatus::Completed {
                suggested_name: "Dawn".into()
            }
        );
        assert_eq!(
            store.images()[1].status,
            ImageStatus::Error {
                message: "service unavailable".into()
            }
        );
    }

    #[test]
    fn test_apply_outcome_ignores_items_that_are_not_generating() {
        let mut store = ImageStore::new();
        store.enqueue(queued("a.png"));
        let id = store.images()[0].id.clone();

        // Still queued: no generation pass started, result must not land
        store.apply_outcome(&id, Ok("Dawn".into()));
        assert_eq!(store.images()[0].status, ImageStatus::Queued);

        // Unknown id: no-op
        store.apply_outcome("no-such-id", Ok("Dawn".into()));
        assert_eq!(store.images().len(), 1);
    }

    #[test]
    fn test_remove_deletes_exactly_one_and_preserves_order() {
        let mut store = ImageStore::new();
        store.enqueue(queued("a.png"));
        store.enqueue(queued("b.png"));
        store.enqueue(queued("c.png"));
        let middle = store.images()[1].id.clone();

        store.remove(&middle);

        let names: Vec<&str> = store.images().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a.png", "c.png"]);

        store.remove("no-such-id");
        assert_eq!(store.images().len(), 2);
    }

    #[test]
    fn test_completed_listing_joins_name_and_suggestion() {
        let mut store = ImageStore::new();
        let mut a = queued("a.png");
        a.status = ImageStatus::Completed {
            suggested_name: "Dawn".into(),
        };
        let b = queued("pending.png");
        let mut c = queued("b.png");
        c.status = ImageStatus::Completed {
            suggested_name: "Dusk".into(),
        };
        store.enqueue(a);
        store.enqueue(b);
        store.enqueue(c);

        assert_eq!(store.completed_listing(), "a.png: Dawn\nb.png: Dusk");
    }

    #[test]
    fn test_clear_empties_the_list() {
        let mut store = ImageStore::new();
        store.enqueue(queued("a.png"));
        store.clear();
        assert!(store.is_empty());
    }
}
