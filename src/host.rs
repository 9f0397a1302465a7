//! The presentation host: file selection → loader → annotation surface.
//!
//! The host owns two pieces of state:
//!
//! * the [`Phase`]: `Picking` until a document has been loaded, then
//!   `Editing` with the shared descriptor;
//! * the `loading` flag: set while a selection is being read and rendered.
//!   While it is set further selections are ignored, and it is cleared
//!   exactly once per attempt by a drop guard, whether the load succeeded,
//!   failed, or the future was dropped midway.
//!
//! Everything platform-specific (the native file chooser, the busy indicator,
//! error notifications, the drawing canvas) sits behind the
//! [`FileChooser`], [`HostObserver`] and [`AnnotationSurface`] traits.

use crate::document::DocumentDescriptor;
use crate::error::LoadError;
use crate::loader::DocumentLoader;
use crate::pipeline::input::{self, PDF_MIME};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// Presentation state.
#[derive(Debug, Clone, Default)]
pub enum Phase {
    /// No document open; the file picker is shown.
    #[default]
    Picking,
    /// A document is open on the annotation surface.
    Editing(Arc<DocumentDescriptor>),
}

impl Phase {
    pub fn is_editing(&self) -> bool {
        matches!(self, Phase::Editing(_))
    }

    pub fn document(&self) -> Option<&Arc<DocumentDescriptor>> {
        match self {
            Phase::Editing(doc) => Some(doc),
            Phase::Picking => None,
        }
    }
}

/// Opens the platform's native file chooser.
///
/// The choice arrives later through [`PresentationHost::on_file_selected`].
pub trait FileChooser: Send + Sync {
    /// Show a chooser restricted to the `accept` MIME type.
    fn choose(&self, accept: &str);
}

/// Receives finished documents; renders and annotates them.
pub trait AnnotationSurface: Send + Sync {
    fn open_document(&self, document: Arc<DocumentDescriptor>);
}

/// UI feedback hooks. Both default to logging only.
pub trait HostObserver: Send + Sync {
    /// Show or hide the busy indicator.
    fn on_loading_changed(&self, loading: bool) {
        debug!("loading = {loading}");
    }

    /// Tell the user a load failed.
    fn on_load_failed(&self, error: &LoadError) {
        error!("Failed to load PDF: {error}");
    }
}

/// Observer that only logs.
pub struct TracingObserver;

impl HostObserver for TracingObserver {}

/// A file the user picked.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    source: FileSource,
}

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl SelectedFile {
    /// A file on the local file system, named after its file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: input::display_name(&path),
            source: FileSource::Path(path),
        }
    }

    /// A file already held in memory (drag-and-drop, clipboard, upload).
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file's raw bytes.
    pub async fn read(self) -> Result<Vec<u8>, LoadError> {
        match self.source {
            FileSource::Path(path) => input::read_file(&path).await,
            FileSource::Bytes(bytes) => Ok(bytes),
        }
    }
}

/// What a file selection led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Nothing selected, or a load was already in progress.
    Ignored,
    /// The document is open on the annotation surface.
    Opened,
    /// Loading failed; the error was reported and the host is back to idle.
    Failed,
}

/// Drives the [`DocumentLoader`] from user file selections.
pub struct PresentationHost {
    loader: DocumentLoader,
    chooser: Arc<dyn FileChooser>,
    surface: Arc<dyn AnnotationSurface>,
    observer: Arc<dyn HostObserver>,
    phase: Mutex<Phase>,
    loading: AtomicBool,
}

impl PresentationHost {
    pub fn new(
        loader: DocumentLoader,
        chooser: Arc<dyn FileChooser>,
        surface: Arc<dyn AnnotationSurface>,
        observer: Arc<dyn HostObserver>,
    ) -> Self {
        Self {
            loader,
            chooser,
            surface,
            observer,
            phase: Mutex::new(Phase::Picking),
            loading: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Open the native chooser for PDF files. No-op while loading.
    pub fn request_file_selection(&self) {
        if self.is_loading() {
            debug!("File selection requested while loading; ignored");
            return;
        }
        self.chooser.choose(PDF_MIME);
    }

    /// Handle the chooser's result.
    ///
    /// Load failures never escape: they are reported through the observer
    /// and the host returns to idle `Picking`.
    pub async fn on_file_selected(&self, file: Option<SelectedFile>) -> SelectionOutcome {
        let Some(file) = file else {
            debug!("File chooser closed without a selection");
            return SelectionOutcome::Ignored;
        };

        let result = {
            let Some(_loading) = LoadingGuard::acquire(self) else {
                warn!("Ignoring '{}': a document is already loading", file.name());
                return SelectionOutcome::Ignored;
            };
            self.load(file).await
        };

        match result {
            Ok(document) => {
                let document = Arc::new(document);
                info!(
                    "Opening '{}' ({} pages) on the annotation surface",
                    document.name,
                    document.page_count()
                );
                *self.phase.lock().unwrap_or_else(PoisonError::into_inner) =
                    Phase::Editing(Arc::clone(&document));
                self.surface.open_document(document);
                SelectionOutcome::Opened
            }
            Err(e) => {
                self.observer.on_load_failed(&e);
                SelectionOutcome::Failed
            }
        }
    }

    /// Leave `Editing` and drop the host's reference to the document.
    pub fn close_document(&self) -> Option<Arc<DocumentDescriptor>> {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        match std::mem::take(&mut *phase) {
            Phase::Editing(doc) => Some(doc),
            Phase::Picking => None,
        }
    }

    async fn load(&self, file: SelectedFile) -> Result<DocumentDescriptor, LoadError> {
        let name = file.name().to_string();
        let bytes = file.read().await?;
        self.loader.load_document(name, bytes).await
    }
}

/// Holds the host's `loading` flag for one load attempt.
struct LoadingGuard<'a> {
    host: &'a PresentationHost,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(host: &'a PresentationHost) -> Option<Self> {
        host.loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        host.observer.on_loading_changed(true);
        Some(Self { host })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.host.loading.store(false, Ordering::SeqCst);
        self.host.observer.on_loading_changed(false);
    }
}
