//! Stamping PDF files on disk
//!
//! Parsing, stamping and serializing run on the blocking pool; only the file
//! reads and writes happen on the runtime.

use super::Stamper;
use crate::content::StampContext;
use crate::render::PdfSurface;
use crate::surface::StampSurface;
use crate::types::*;
use std::path::Path;

/// Read and parse a PDF into a surface ready for stamping
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<PdfSurface> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    tokio::task::spawn_blocking(move || PdfSurface::load(&bytes)).await?
}

/// Write a surface out, including anything drawn but not yet flushed
pub async fn save_pdf(mut surface: PdfSurface, path: impl AsRef<Path>) -> Result<()> {
    let bytes = tokio::task::spawn_blocking(move || surface.serialize()).await??;
    tokio::fs::write(path.as_ref(), bytes).await?;
    Ok(())
}

impl Stamper {
    /// Stamp a loaded surface on the blocking pool
    pub async fn stamp_pdf(
        &self,
        mut surface: PdfSurface,
        filename: Option<String>,
    ) -> Result<PdfSurface> {
        let stamper = self.clone();
        tokio::task::spawn_blocking(move || {
            stamper.stamp_surface(&mut surface, &StampContext::new(filename))?;
            Ok(surface)
        })
        .await?
    }

    /// Stamp `input` into `output`, using the input's file name for the
    /// filename line. Returns the stamped page indices.
    pub async fn stamp_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<Vec<usize>> {
        let input = input.as_ref();
        let filename = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let bytes = tokio::fs::read(input).await?;

        let stamper = self.clone();
        let (pages, stamped) = tokio::task::spawn_blocking(move || {
            let mut surface = PdfSurface::load(&bytes)?;
            let pages = stamper.stamp_surface(&mut surface, &StampContext::new(filename))?;
            Ok::<_, StampError>((pages, surface.serialize()?))
        })
        .await??;

        tokio::fs::write(output.as_ref(), stamped).await?;
        log::info!(
            "Stamped {} page(s) of {} into {}",
            pages.len(),
            input.display(),
            output.as_ref().display()
        );
        Ok(pages)
    }
}
