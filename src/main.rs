use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::time::Duration;

// Declare the application modules
mod config;
mod error;
mod scan;
mod source;
mod state;
mod ui;

use config::AppConfig;
use error::Error;
use source::camera::CameraSource;
use source::video::VideoSource;
use source::{folder, Frame, FrameSource};
use state::session::{ImageEntry, Mode, ScanStatus, Session};

/// Main application state: the session, the currently open frame source,
/// and what is on screen right now.
struct BarcodeReader {
    /// Persisted settings (camera index, tick periods)
    config: AppConfig,
    /// Mode, image list and scan status
    session: Session,
    /// The exclusively-owned frame source; dropping it releases the
    /// camera device or kills the video child process
    source: Option<Box<dyn FrameSource>>,
    /// The processed (overlaid) frame currently on screen, kept for saving
    displayed: Option<Frame>,
    /// Display handle for the frame viewer
    handle: Option<iced::widget::image::Handle>,
    /// Accumulated decoded text, one result per line
    decoded_text: String,
    /// One-line status/diagnostic message
    status_line: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Live/Stop toggle
    ToggleLive,
    /// Single-shot capture and decode
    Trigger,
    /// Save the currently displayed frame
    SaveImage,
    /// Load one image as the whole image list
    LoadImage,
    /// Open a video file and start playback
    LoadVideo,
    /// Load every recognized image in a folder
    LoadFolder,
    /// Previous image in the list (wraps)
    PrevImage,
    /// Next image in the list (wraps)
    NextImage,
    /// Periodic acquisition tick (live or video)
    Tick,
}

impl BarcodeReader {
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load();
        // First run: persist the defaults so the file is there to edit
        if let Err(e) = config.save() {
            tracing::warn!("could not persist config: {e}");
        }

        (
            BarcodeReader {
                config,
                session: Session::new(),
                source: None,
                displayed: None,
                handle: None,
                decoded_text: String::new(),
                status_line: String::from("Ready"),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state.
    ///
    /// Every user action maps to one controller method; failures surface in
    /// the status line and the session recovers to a consistent idle state
    /// instead of crashing the event loop.
    fn update(&mut self, message: Message) -> Task<Message> {
        let result = match message {
            Message::ToggleLive => self.toggle_live(),
            Message::Trigger => self.capture_image(),
            Message::SaveImage => self.save_image(),
            Message::LoadImage => self.load_image(),
            Message::LoadVideo => self.load_video(),
            Message::LoadFolder => self.load_folder(),
            Message::PrevImage => self.step_image(false),
            Message::NextImage => self.step_image(true),
            Message::Tick => self.tick(),
        };

        if let Err(e) = result {
            tracing::warn!("{e}");
            self.status_line = e.to_string();
            self.recover(&e);
        }

        Task::none()
    }

    /// Live toggle: open the camera and start ticking, or stop whatever
    /// acquisition is running.
    fn toggle_live(&mut self) -> Result<(), Error> {
        match self.session.mode() {
            Mode::Idle => {
                let camera = CameraSource::open(self.config.camera_index)?;
                self.status_line = format!("Live from {}", camera.describe());
                self.source = Some(Box::new(camera));
                self.session.set_mode(Mode::Live);
                Ok(())
            }
            // The same button stops video playback
            Mode::Live | Mode::Video => {
                self.stop_acquisition("Stopped");
                Ok(())
            }
        }
    }

    /// Single-shot trigger: grab one frame, decode, overlay, display.
    ///
    /// Uses the open source if one is held; otherwise the camera is opened
    /// just for this frame and released again (scoped acquisition).
    fn capture_image(&mut self) -> Result<(), Error> {
        if self.session.is_busy() {
            return Ok(());
        }

        let frame = match self.source.as_mut() {
            Some(source) => source.grab()?,
            None => CameraSource::open(self.config.camera_index)?.grab()?,
        };

        match frame {
            Some(frame) => self.process_and_display(frame),
            None => {
                self.status_line = String::from("Source is exhausted");
                Ok(())
            }
        }
    }

    /// Save the displayed (already overlaid) frame at a user-chosen path.
    fn save_image(&mut self) -> Result<(), Error> {
        if self.session.is_busy() {
            return Ok(());
        }
        let Some(frame) = self.displayed.as_ref() else {
            tracing::info!("save requested with nothing displayed");
            self.status_line = String::from("No image to save");
            return Ok(());
        };

        let picked = FileDialog::new()
            .set_title("Save Image")
            .add_filter("Images", &folder::IMAGE_EXTENSIONS)
            .set_file_name("capture.png")
            .save_file();
        let Some(mut path) = picked else {
            return Ok(());
        };

        if path.extension().is_none() {
            path.set_extension("png");
        }
        frame.save(&path)?;

        tracing::info!(path = %path.display(), "image saved");
        self.status_line = format!("Saved {}", path.display());
        Ok(())
    }

    /// Load a single image file as the sole image-list entry and scan it.
    fn load_image(&mut self) -> Result<(), Error> {
        if self.session.is_busy() {
            return Ok(());
        }
        let picked = FileDialog::new()
            .set_title("Load Image")
            .add_filter("Images", &folder::IMAGE_EXTENSIONS)
            .pick_file();
        let Some(path) = picked else {
            return Ok(());
        };

        let frame = folder::load_frame(&path)?;
        self.status_line = format!("Loaded {}", path.display());
        self.session.set_images(vec![ImageEntry {
            path: Some(path),
            frame: frame.clone(),
        }]);
        self.process_and_display(frame)
    }

    /// Open a video file and start the playback tick.
    fn load_video(&mut self) -> Result<(), Error> {
        if self.session.is_busy() {
            return Ok(());
        }
        let picked = FileDialog::new()
            .set_title("Load Video")
            .add_filter("Video", &["mp4", "avi"])
            .pick_file();
        let Some(path) = picked else {
            return Ok(());
        };

        let video = VideoSource::open(&path)?;
        self.status_line = format!("Playing {}", path.display());
        // Replacing the slot drops any previously held source
        self.source = Some(Box::new(video));
        self.session.clear_images();
        self.session.set_mode(Mode::Video);
        Ok(())
    }

    /// Load every recognized image in a folder into the image list and
    /// display the first one.
    fn load_folder(&mut self) -> Result<(), Error> {
        if self.session.is_busy() {
            return Ok(());
        }
        let Some(dir) = FileDialog::new().set_title("Load Image Folder").pick_folder() else {
            return Ok(());
        };

        let mut entries = Vec::new();
        for path in folder::scan_folder(&dir) {
            match folder::load_frame(&path) {
                Ok(frame) => entries.push(ImageEntry {
                    path: Some(path),
                    frame,
                }),
                Err(e) => tracing::warn!("skipping unreadable {}: {e}", path.display()),
            }
        }

        if entries.is_empty() {
            self.session.clear_images();
            self.status_line = format!("No images in {}", dir.display());
            return Ok(());
        }

        let count = entries.len();
        self.session.set_images(entries);
        self.status_line = format!("Loaded {count} images from {}", dir.display());

        let first = self.session.current().map(|entry| entry.frame.clone());
        match first {
            Some(frame) => self.process_and_display(frame),
            None => Ok(()),
        }
    }

    /// Move through the image list with wraparound and rescan the frame
    /// at the new position.
    fn step_image(&mut self, forward: bool) -> Result<(), Error> {
        if self.session.is_busy() {
            return Ok(());
        }
        if self.session.image_count() == 0 {
            self.status_line = String::from("No images loaded");
            return Ok(());
        }

        let entry = if forward {
            self.session.next()
        } else {
            self.session.prev()
        };
        let frame = entry.map(|entry| entry.frame.clone());

        if let Some(frame) = frame {
            self.status_line = format!(
                "Image {}/{}",
                self.session.index() + 1,
                self.session.image_count()
            );
            self.process_and_display(frame)?;
        }
        Ok(())
    }

    /// One acquisition tick: pull, decode, overlay, display. A drained
    /// source (end of video) stops the tick and releases the source.
    fn tick(&mut self) -> Result<(), Error> {
        if !self.session.is_busy() {
            return Ok(());
        }
        let grabbed = match self.source.as_mut() {
            Some(source) => source.grab()?,
            None => return Ok(()),
        };

        match grabbed {
            Some(frame) => self.process_and_display(frame),
            None => {
                let note = self
                    .source
                    .as_ref()
                    .map(|source| format!("End of {}", source.describe()))
                    .unwrap_or_default();
                self.stop_acquisition(&note);
                Ok(())
            }
        }
    }

    /// The uniform decode + overlay + display step applied by every action.
    ///
    /// The lamp starts at no-read for the frame and flips to read as soon
    /// as the accumulated text becomes non-empty. Each result's text goes
    /// on its own line, in decoder order.
    fn process_and_display(&mut self, mut frame: Frame) -> Result<(), Error> {
        let results = scan::decode_frame(&frame)?;

        self.decoded_text.clear();
        self.session.set_status(ScanStatus::NoRead);

        for result in &results {
            if !self.decoded_text.is_empty() {
                self.decoded_text.push('\n');
            }
            self.decoded_text.push_str(&result.text);
            if !self.decoded_text.is_empty() {
                self.session.set_status(ScanStatus::Read);
            }
            scan::overlay::draw_result(&mut frame, result);
        }

        if !results.is_empty() {
            tracing::info!(count = results.len(), "barcodes decoded");
        }

        self.handle = Some(ui::frame_handle(&frame));
        self.displayed = Some(frame);
        Ok(())
    }

    /// Stop any running acquisition: release the source, clear the display
    /// and reset the lamp to neutral.
    fn stop_acquisition(&mut self, note: &str) {
        self.source = None;
        self.session.set_mode(Mode::Idle);
        self.session.set_status(ScanStatus::Idle);
        self.handle = None;
        self.displayed = None;
        self.decoded_text.clear();
        self.status_line = note.to_string();
        tracing::info!("acquisition stopped");
    }

    /// Put the session back into a consistent state after a failure.
    /// Source problems (and any failure mid-acquisition) release the
    /// source and drop back to idle; everything else leaves the display
    /// alone.
    fn recover(&mut self, error: &Error) {
        if matches!(error, Error::SourceUnavailable(_)) || self.session.is_busy() {
            self.source = None;
            self.session.set_mode(Mode::Idle);
            self.session.set_status(ScanStatus::Idle);
        }
    }

    /// The acquisition tick, active only while live or playing a video.
    fn subscription(&self) -> Subscription<Message> {
        let period = match self.session.mode() {
            Mode::Live => self.config.live_interval_ms,
            Mode::Video => self.config.video_interval_ms,
            Mode::Idle => return Subscription::none(),
        };
        iced::time::every(Duration::from_millis(period)).map(|_| Message::Tick)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let idle = !self.session.is_busy();
        let live_label = match self.session.mode() {
            Mode::Idle => "LIVE",
            Mode::Live | Mode::Video => "STOP",
        };

        let controls = column![
            action_button(live_label, Some(Message::ToggleLive)),
            action_button("Trigger", idle.then_some(Message::Trigger)),
            action_button("Save Image", idle.then_some(Message::SaveImage)),
            action_button("Load Image", idle.then_some(Message::LoadImage)),
            action_button("Load Video", idle.then_some(Message::LoadVideo)),
            action_button("Load Folder", idle.then_some(Message::LoadFolder)),
            action_button("Previous", idle.then_some(Message::PrevImage)),
            action_button("Next", idle.then_some(Message::NextImage)),
            ui::status_lamp(self.session.status()),
        ]
        .spacing(8)
        .width(Length::Fixed(150.0));

        let display: Element<Message> = match &self.handle {
            Some(handle) => ui::frame_view(handle),
            None => container(text("No image").size(20))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let text_pane = scrollable(text(&self.decoded_text).size(16))
            .width(Length::Fill)
            .height(Length::Fixed(110.0));

        let content = row![
            controls,
            column![display, text_pane, text(&self.status_line).size(14)].spacing(10),
        ]
        .spacing(12)
        .padding(12);

        content.into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// A uniformly sized control button; `None` renders it disabled.
fn action_button(label: &'static str, on_press: Option<Message>) -> Element<'static, Message> {
    button(text(label).width(Length::Fill).center())
        .on_press_maybe(on_press)
        .width(Length::Fill)
        .padding(8)
        .into()
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    iced::application("Barcode Reader", BarcodeReader::update, BarcodeReader::view)
        .subscription(BarcodeReader::subscription)
        .theme(BarcodeReader::theme)
        .centered()
        .run_with(BarcodeReader::new)
}
