use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use iced::widget::{image, text_editor};
use iced::{Element, Subscription, Task, Theme};
use rfd::FileDialog;

mod config;
mod ingest;
mod naming;
mod state;
mod ui;

use config::Config;
use ingest::urls::UrlFetcher;
use ingest::IngestReport;
use naming::NamingClient;
use state::data::NameStyle;
use state::sequence::OrderedResults;
use state::store::{ImageStore, NameOutcome};

/// How long the transient "Copied!" indicator stays visible
const COPY_INDICATOR_TTL: Duration = Duration::from_secs(2);

/// What the "Copied!" indicator is attached to
#[derive(Debug, Clone, PartialEq)]
pub enum CopyTarget {
    Item(String),
    All,
}

/// Main application state
pub struct ImageNamer {
    /// The image batch, owned here and only read by the view
    store: ImageStore,
    /// Style applied to the next generation pass
    style: NameStyle,
    url_input: text_editor::Content,
    /// True from the start of a generation pass until every result has
    /// been applied
    generating: bool,
    /// True while a file-read or URL-fetch pass is running
    ingesting: bool,
    error_banner: Option<String>,
    copied: Option<CopyTarget>,
    /// Bumped on every copy so a stale expiry timer cannot clear a newer
    /// indicator
    copy_epoch: u64,
    /// Initiation-order queue for in-flight naming results
    pending: OrderedResults<NameOutcome>,
    /// Decoded previews, keyed by item id; UI-side only
    thumbnails: HashMap<String, image::Handle>,
    namer: NamingClient,
    fetcher: UrlFetcher,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User picked a naming style
    StyleSelected(NameStyle),
    /// User clicked "Add Images"
    PickFiles,
    /// User clicked "Add Folder"
    PickFolder,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    /// A file-ingestion pass finished
    FilesLoaded(IngestReport),
    UrlInputEdited(text_editor::Action),
    /// User clicked "Fetch URLs"
    FetchUrls,
    /// A URL-ingestion pass finished
    UrlsFetched(IngestReport),
    /// User clicked "Generate Names"
    GenerateAll,
    /// One naming request settled
    NameArrived(String, NameOutcome),
    RemoveImage(String),
    ClearAll,
    CopyName(String),
    CopyAll,
    CopyIndicatorExpired(u64),
    DismissError,
}

impl ImageNamer {
    fn new(config: Config) -> (Self, Task<Message>) {
        log::info!("🏷️  Image Namer initialized with model {}", config.model);
        (
            ImageNamer {
                store: ImageStore::new(),
                style: NameStyle::Descriptive,
                url_input: text_editor::Content::new(),
                generating: false,
                ingesting: false,
                error_banner: None,
                copied: None,
                copy_epoch: 0,
                pending: OrderedResults::new(),
                thumbnails: HashMap::new(),
                namer: NamingClient::new(&config),
                fetcher: UrlFetcher::new(&config),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StyleSelected(style) => {
                self.style = style;
                Task::none()
            }

            Message::PickFiles => {
                if self.busy() {
                    return Task::none();
                }
                let picked = FileDialog::new()
                    .set_title("Select Images")
                    .add_filter(
                        "Images",
                        &[
                            "jpg", "jpeg", "png", "gif", "webp", "bmp", "avif", "tif", "tiff",
                            "heic", "svg",
                        ],
                    )
                    .pick_files();

                match picked {
                    Some(paths) => self.load_files(paths),
                    None => Task::none(),
                }
            }

            Message::PickFolder => {
                if self.busy() {
                    return Task::none();
                }
                let folder = FileDialog::new()
                    .set_title("Select Folder with Images")
                    .pick_folder();

                match folder {
                    Some(path) => self.load_files(vec![path]),
                    None => Task::none(),
                }
            }

            Message::FileDropped(path) => {
                if self.busy() {
                    return Task::none();
                }
                self.load_files(vec![path])
            }

            Message::FilesLoaded(report) => {
                self.ingesting = false;
                self.absorb_report(report, ingest::files::failure_banner);
                Task::none()
            }

            Message::UrlInputEdited(action) => {
                self.url_input.perform(action);
                Task::none()
            }

            Message::FetchUrls => {
                if self.busy() {
                    return Task::none();
                }
                let input = self.url_input.text();
                if input.trim().is_empty() {
                    self.error_banner = Some("Enter at least one image URL.".to_string());
                    return Task::none();
                }
                self.error_banner = None;
                self.ingesting = true;
                Task::perform(self.fetcher.clone().fetch_list(input), Message::UrlsFetched)
            }

            Message::UrlsFetched(report) => {
                self.ingesting = false;
                self.absorb_report(report, ingest::urls::failure_banner);
                // The input is cleared only once the whole pass has
                // settled, success or failure
                self.url_input = text_editor::Content::new();
                Task::none()
            }

            Message::GenerateAll => {
                if self.generating {
                    return Task::none();
                }
                let jobs = self.store.begin_generation();
                if jobs.is_empty() {
                    return Task::none();
                }
                log::info!("generating names for {} image(s)", jobs.len());

                self.generating = true;
                self.pending = OrderedResults::start(jobs.iter().map(|job| job.id.clone()));

                let style = self.style;
                let tasks = jobs.into_iter().map(|job| {
                    let client = self.namer.clone();
                    Task::perform(
                        async move {
                            let outcome = client
                                .generate_name(&job.base64, &job.mime_type, style)
                                .await
                                .map_err(|_| naming::GENERATION_ERROR_MESSAGE.to_string());
                            (job.id, outcome)
                        },
                        |(id, outcome)| Message::NameArrived(id, outcome),
                    )
                });
                Task::batch(tasks)
            }

            Message::NameArrived(id, outcome) => {
                // Results become visible in initiation order: buffer this
                // arrival and apply whatever prefix of the batch is ready.
                for (ready_id, ready) in self.pending.arrive(id, outcome) {
                    self.store.apply_outcome(&ready_id, ready);
                }
                if self.generating && self.pending.is_drained() {
                    self.generating = false;
                    log::info!("naming batch finished");
                }
                Task::none()
            }

            Message::RemoveImage(id) => {
                self.store.remove(&id);
                self.thumbnails.remove(&id);
                if self.copied == Some(CopyTarget::Item(id)) {
                    self.copied = None;
                }
                Task::none()
            }

            Message::ClearAll => {
                self.store.clear();
                self.thumbnails.clear();
                self.pending.reset();
                self.error_banner = None;
                self.generating = false;
                self.copied = None;
                Task::none()
            }

            Message::CopyName(id) => {
                let Some(suggested) = self
                    .store
                    .get(&id)
                    .and_then(|item| item.suggested_name())
                    .map(str::to_string)
                else {
                    return Task::none();
                };
                self.copied = Some(CopyTarget::Item(id));
                self.copy_to_clipboard(suggested)
            }

            Message::CopyAll => {
                if !self.store.has_completed() {
                    return Task::none();
                }
                let listing = self.store.completed_listing();
                self.copied = Some(CopyTarget::All);
                self.copy_to_clipboard(listing)
            }

            Message::CopyIndicatorExpired(epoch) => {
                if epoch == self.copy_epoch {
                    self.copied = None;
                }
                Task::none()
            }

            Message::DismissError => {
                self.error_banner = None;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        ui::view(self)
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(iced::window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn busy(&self) -> bool {
        self.generating || self.ingesting
    }

    /// Kick off a file-ingestion pass for the given paths
    fn load_files(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        self.error_banner = None;
        self.ingesting = true;
        Task::perform(ingest::files::load_paths(paths), Message::FilesLoaded)
    }

    /// Append an ingest pass to the batch in one update and surface its
    /// failures, if any, as the aggregate banner
    fn absorb_report(&mut self, report: IngestReport, banner: fn(&[String]) -> String) {
        if !report.failed.is_empty() {
            log::warn!("ingestion pass had {} failure(s)", report.failed.len());
            self.error_banner = Some(banner(&report.failed));
        }
        for item in &report.accepted {
            if let Ok(bytes) = BASE64.decode(&item.base64) {
                self.thumbnails
                    .insert(item.id.clone(), image::Handle::from_bytes(bytes));
            }
        }
        self.store.extend(report.accepted);
    }

    /// Write to the system clipboard (best-effort) and arm the indicator
    /// expiry timer
    fn copy_to_clipboard(&mut self, contents: String) -> Task<Message> {
        self.copy_epoch += 1;
        let epoch = self.copy_epoch;
        Task::batch([
            iced::clipboard::write(contents),
            Task::perform(
                async { tokio::time::sleep(COPY_INDICATOR_TTL).await },
                move |_| Message::CopyIndicatorExpired(epoch),
            ),
        ])
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The credential is required before any UI exists; fail closed.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            log::error!("{}", error);
            eprintln!("image-namer: {}", error);
            std::process::exit(1);
        }
    };

    iced::application("Image Namer", ImageNamer::update, ImageNamer::view)
        .subscription(ImageNamer::subscription)
        .theme(ImageNamer::theme)
        .window_size(iced::Size::new(900.0, 700.0))
        .centered()
        .run_with(move || ImageNamer::new(config.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{ImageStatus, ProcessedImage};

    fn test_app() -> ImageNamer {
        let config = Config {
            api_key: "test-key".into(),
            model: "test-model".into(),
            api_base: "http://127.0.0.1:1".into(),
            relay_base: "http://127.0.0.1:1".into(),
        };
        ImageNamer::new(config).0
    }

    fn queued(name: &str) -> ProcessedImage {
        ProcessedImage::new("aGk=".into(), "image/png".into(), name.into())
    }

    #[test]
    fn test_generate_with_zero_queued_leaves_state_unchanged() {
        let mut app = test_app();
        let _ = app.update(Message::GenerateAll);

        assert!(!app.generating);
        assert!(app.store.is_empty());
        assert!(app.pending.is_drained());
    }

    #[test]
    fn test_results_apply_in_initiation_order_and_flag_clears_after_all() {
        let mut app = test_app();
        app.store.enqueue(queued("a.png"));
        app.store.enqueue(queued("b.png"));

        let _ = app.update(Message::GenerateAll);
        assert!(app.generating);
        let ids: Vec<String> = app.store.images().iter().map(|i| i.id.clone()).collect();
        assert!(app
            .store
            .images()
            .iter()
            .all(|item| item.status == ImageStatus::Generating));

        // The second item finishes first: its update is deferred
        let _ = app.update(Message::NameArrived(ids[1].clone(), Ok("Dusk".into())));
        assert_eq!(app.store.images()[1].status, ImageStatus::Generating);
        assert!(app.generating);

        // The first result releases both, in order
        let _ = app.update(Message::NameArrived(ids[0].clone(), Ok("Dawn".into())));
        assert_eq!(
            app.store.images()[0].status,
            ImageStatus::Completed {
                suggested_name: "Dawn".into()
            }
        );
        assert_eq!(
            app.store.images()[1].status,
            ImageStatus::Completed {
                suggested_name: "Dusk".into()
            }
        );
        assert!(!app.generating);
    }

    #[test]
    fn test_failed_item_keeps_the_rest_of_the_batch_alive() {
        let mut app = test_app();
        app.store.enqueue(queued("a.png"));
        app.store.enqueue(queued("b.png"));

        let _ = app.update(Message::GenerateAll);
        let ids: Vec<String> = app.store.images().iter().map(|i| i.id.clone()).collect();

        let _ = app.update(Message::NameArrived(
            ids[0].clone(),
            Err(naming::GENERATION_ERROR_MESSAGE.to_string()),
        ));
        let _ = app.update(Message::NameArrived(ids[1].clone(), Ok("Dusk".into())));

        assert!(matches!(
            &app.store.images()[0].status,
            ImageStatus::Error { message } if message == naming::GENERATION_ERROR_MESSAGE
        ));
        assert_eq!(
            app.store.images()[1].status,
            ImageStatus::Completed {
                suggested_name: "Dusk".into()
            }
        );
        assert!(!app.generating);
    }

    #[test]
    fn test_clear_all_resets_list_and_flags_and_drops_late_results() {
        let mut app = test_app();
        app.store.enqueue(queued("a.png"));
        let _ = app.update(Message::GenerateAll);
        let id = app.store.images()[0].id.clone();
        app.error_banner = Some("old banner".into());

        let _ = app.update(Message::ClearAll);
        assert!(app.store.is_empty());
        assert!(!app.generating);
        assert!(app.error_banner.is_none());
        assert!(app.copied.is_none());

        // A result still in flight at clear time lands nowhere
        let _ = app.update(Message::NameArrived(id, Ok("Dawn".into())));
        assert!(app.store.is_empty());
        assert!(!app.generating);
    }

    #[test]
    fn test_fetch_urls_with_blank_input_shows_validation_banner() {
        let mut app = test_app();
        let _ = app.update(Message::FetchUrls);

        assert!(!app.ingesting);
        assert_eq!(
            app.error_banner.as_deref(),
            Some("Enter at least one image URL.")
        );
    }

    #[test]
    fn test_ingest_report_is_absorbed_in_one_update() {
        let mut app = test_app();
        let report = IngestReport {
            accepted: vec![queued("a.png"), queued("b.png")],
            failed: vec!["https://example.com/broken".into()],
        };

        let _ = app.update(Message::UrlsFetched(report));

        assert_eq!(app.store.images().len(), 2);
        assert!(app
            .error_banner
            .as_deref()
            .is_some_and(|banner| banner.contains("https://example.com/broken")));
    }

    #[test]
    fn test_copy_indicator_expiry_is_epoch_guarded() {
        let mut app = test_app();
        app.copied = Some(CopyTarget::All);
        app.copy_epoch = 2;

        let _ = app.update(Message::CopyIndicatorExpired(1));
        assert_eq!(app.copied, Some(CopyTarget::All));

        let _ = app.update(Message::CopyIndicatorExpired(2));
        assert!(app.copied.is_none());
    }

    #[test]
    fn test_remove_clears_a_matching_copy_indicator() {
        let mut app = test_app();
        app.store.enqueue(queued("a.png"));
        let id = app.store.images()[0].id.clone();
        app.copied = Some(CopyTarget::Item(id.clone()));

        let _ = app.update(Message::RemoveImage(id));

        assert!(app.store.is_empty());
        assert!(app.copied.is_none());
    }
}
