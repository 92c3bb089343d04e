//! Process-wide pdfium setup.
//!
//! [`PdfEngine::initialize`] is called once from `main` before the worker
//! starts. It settles which pdfium library to use and checks that it binds.
//! `Pdfium` itself is not `Send`, so jobs call [`PdfEngine::bind`] inside
//! their blocking task instead of sharing one instance.

use pdf_loader::{LoaderError, Result};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static ENGINE: OnceLock<PdfEngine> = OnceLock::new();

#[derive(Debug)]
pub struct PdfEngine {
    /// `None` means the system library
    library_path: Option<PathBuf>,
}

impl PdfEngine {
    /// Resolve and verify the pdfium library. Later calls return the engine
    /// from the first successful call and ignore `pdfium_dir`.
    pub fn initialize(pdfium_dir: Option<&Path>) -> Result<&'static PdfEngine> {
        if let Some(engine) = ENGINE.get() {
            return Ok(engine);
        }

        let engine = Self::resolve(pdfium_dir)?;
        match &engine.library_path {
            Some(path) => log::info!("Using pdfium from {}", path.display()),
            None => log::info!("Using system pdfium"),
        }
        Ok(ENGINE.get_or_init(|| engine))
    }

    fn resolve(pdfium_dir: Option<&Path>) -> Result<Self> {
        // Configured directory first, then the vendored copy the build script
        // downloads (relative to the working directory, i.e. workspace root
        // when run through cargo)
        let vendor_dir = std::env::current_dir()
            .ok()
            .map(|dir| dir.join("vendor/pdfium/lib"));
        let candidates = pdfium_dir.map(Path::to_path_buf).into_iter().chain(vendor_dir);

        for dir in candidates {
            let library = Pdfium::pdfium_platform_library_name_at_path(&dir);
            if !library.exists() {
                continue;
            }
            match Pdfium::bind_to_library(&library) {
                Ok(bindings) => {
                    drop(Pdfium::new(bindings));
                    return Ok(Self {
                        library_path: Some(library),
                    });
                }
                Err(e) => log::warn!("Could not bind {}: {}", library.display(), e),
            }
        }

        Pdfium::bind_to_system_library()
            .map(|bindings| {
                drop(Pdfium::new(bindings));
                Self { library_path: None }
            })
            .map_err(|e| LoaderError::Engine(format!("pdfium library not found: {}", e)))
    }

    pub fn bind(&self) -> Result<Pdfium> {
        let bindings = match &self.library_path {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        };
        bindings
            .map(Pdfium::new)
            .map_err(|e| LoaderError::Engine(e.to_string()))
    }
}
