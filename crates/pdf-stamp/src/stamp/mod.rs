//! PDF stamping - overlaying the company block on existing pages
//!
//! This module orchestrates one stamping pass:
//! 1. Resolve the target pages
//! 2. Prepare and embed the content once per document
//! 3. Stack it into a block
//! 4. Lay the block out on every target page and draw it

mod batch;
mod draw;
mod io;

pub use batch::BatchInput;
pub use io::{load_pdf, save_pdf};

use crate::constants::ELEMENT_GAP;
use crate::content::{StampContext, StampResources, prepare_content};
use crate::layout::stack_elements;
use crate::options::{CompanySettings, StampOptions};
use crate::pages::resolve_target_pages;
use crate::preview::{PageLayout, layout_page};
use crate::render::PdfSurface;
use crate::surface::StampSurface;
use crate::types::*;
use std::sync::Arc;

/// Settings, options and loaded assets for stamping any number of documents
#[derive(Clone)]
pub struct Stamper {
    settings: CompanySettings,
    options: StampOptions,
    resources: Arc<StampResources>,
}

impl Stamper {
    /// Validate `options` and bundle them with already loaded resources
    pub fn new(
        settings: CompanySettings,
        options: StampOptions,
        resources: StampResources,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            settings,
            options,
            resources: Arc::new(resources),
        })
    }

    /// Validate `options` and load the assets `settings` point at
    pub async fn load(settings: CompanySettings, options: StampOptions) -> Result<Self> {
        options.validate()?;
        let resources = StampResources::load(&settings, &options).await;
        Self::new(settings, options, resources)
    }

    pub fn settings(&self) -> &CompanySettings {
        &self.settings
    }

    pub fn options(&self) -> &StampOptions {
        &self.options
    }

    /// Compute where everything goes on each target page without drawing.
    ///
    /// Images are embedded into `surface` as a side effect.
    pub fn plan(
        &self,
        surface: &mut dyn StampSurface,
        context: &StampContext,
    ) -> Result<Vec<PageLayout>> {
        let total_pages = surface.page_count();
        if total_pages == 0 {
            return Err(StampError::NoPages);
        }

        let targets = resolve_target_pages(&self.options.page_selection(), total_pages);
        if targets.is_empty() {
            log::warn!("No pages selected out of {}", total_pages);
            return Ok(Vec::new());
        }

        let content = prepare_content(
            surface,
            &self.settings,
            &self.options,
            &self.resources,
            context,
        );
        let block = stack_elements(content.elements, self.options.alignment, ELEMENT_GAP);
        log::debug!(
            "Stamp block {}x{} with {} elements",
            block.width,
            block.height,
            block.elements.len()
        );

        let placement = self.options.placement();
        let signature_position = self.options.signature_placement();

        targets
            .into_iter()
            .map(|page_index| {
                let geometry = surface.page_geometry(page_index)?;
                Ok(layout_page(
                    page_index,
                    geometry,
                    &block,
                    content.detached_signature.as_ref(),
                    &placement,
                    &signature_position,
                ))
            })
            .collect()
    }

    /// Stamp every target page of `surface`. Returns the stamped page indices.
    pub fn stamp_surface(
        &self,
        surface: &mut dyn StampSurface,
        context: &StampContext,
    ) -> Result<Vec<usize>> {
        let layouts = self.plan(surface, context)?;
        for layout in &layouts {
            draw::draw_page(surface, layout, &self.options)?;
        }
        Ok(layouts.iter().map(|layout| layout.page_index).collect())
    }

    /// Stamp a serialized PDF and serialize the result
    pub fn stamp_bytes(&self, bytes: &[u8], context: &StampContext) -> Result<Vec<u8>> {
        let mut surface = PdfSurface::load(bytes)?;
        let pages = self.stamp_surface(&mut surface, context)?;
        log::info!(
            "Stamped {} page(s){}",
            pages.len(),
            context
                .filename
                .as_deref()
                .map(|name| format!(" of {}", name))
                .unwrap_or_default()
        );
        surface.serialize()
    }
}
