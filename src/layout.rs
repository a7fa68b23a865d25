//! Page layout - taffy column layout for the scrollable section stack.
//!
//! The home page is one flex column: hero (90% of the viewport height, like
//! the original full-bleed hero), then content-sized sections. Layout runs
//! on mount and on terminal resize; the resulting rects are written into the
//! surface registry and the viewport observations are re-evaluated against
//! them.
//!
//! The nav is a fixed overlay over the top rows of the viewport and does not
//! participate in the column flow.

use taffy::{AvailableSpace, Dimension, FlexDirection, Size, Style, TaffyTree};
use thiserror::Error;

use crate::content;
use crate::types::{Rect, SectionKind};

/// Rows reserved for the fixed nav bar (expanded state).
pub const NAV_ROWS: f64 = 3.0;

/// Fraction of the viewport height taken by the hero.
pub const HERO_VIEWPORT_FRACTION: f64 = 0.9;

/// Rows of one showcase card including its caption block.
pub const CARD_ROWS: f64 = 14.0;

/// Layout failure from the flexbox engine.
#[derive(Debug, Error)]
#[error("page layout failed: {0}")]
pub struct LayoutError(#[from] taffy::TaffyError);

/// Computed page geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Fixed nav rect in viewport coordinates.
    pub nav: Rect,
    /// Section rects in content (scrollable) coordinates, document order.
    pub sections: Vec<(SectionKind, Rect)>,
    /// Total scrollable height.
    pub content_height: f64,
}

impl PageLayout {
    /// Rect of one section, if it is part of the flow.
    pub fn rect_of(&self, kind: SectionKind) -> Option<Rect> {
        self.sections
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, r)| *r)
    }
}

/// Showcase grid columns for a given viewport width.
pub fn showcase_columns(width: f64) -> usize {
    if width >= 96.0 {
        3
    } else if width >= 60.0 {
        2
    } else {
        1
    }
}

/// Content-driven height of each flow section, in rows.
fn section_height(kind: SectionKind, width: f64, height: f64) -> f64 {
    match kind {
        SectionKind::Hero => (height * HERO_VIEWPORT_FRACTION).round().max(10.0),
        SectionKind::Showcase => {
            let cols = showcase_columns(width);
            let rows = content::WORKS.len().div_ceil(cols) as f64;
            9.0 + rows * CARD_ROWS + 6.0
        }
        SectionKind::About => 26.0,
        SectionKind::Contact => 24.0,
        SectionKind::Footer => 12.0,
    }
}

/// Compute the page layout for a terminal of `width` x `height` cells.
pub fn compute_page_layout(width: f64, height: f64) -> Result<PageLayout, LayoutError> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let mut children = Vec::with_capacity(SectionKind::FLOW.len());
    for kind in SectionKind::FLOW {
        let node = tree.new_leaf(Style {
            size: Size {
                width: Dimension::Percent(1.0),
                height: Dimension::Length(section_height(kind, width, height) as f32),
            },
            flex_shrink: 0.0,
            ..Default::default()
        })?;
        children.push((kind, node));
    }

    let root = tree.new_with_children(
        Style {
            flex_direction: FlexDirection::Column,
            size: Size {
                width: Dimension::Length(width as f32),
                height: Dimension::Auto,
            },
            ..Default::default()
        },
        &children.iter().map(|(_, n)| *n).collect::<Vec<_>>(),
    )?;

    tree.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::MaxContent,
        },
    )?;

    let mut sections = Vec::with_capacity(children.len());
    for (kind, node) in &children {
        let layout = tree.layout(*node)?;
        sections.push((
            *kind,
            Rect::new(
                layout.location.x as f64,
                layout.location.y as f64,
                layout.size.width as f64,
                layout.size.height as f64,
            ),
        ));
    }

    let content_height = tree.layout(root)?.size.height as f64;

    Ok(PageLayout {
        nav: Rect::new(0.0, 0.0, width, NAV_ROWS),
        sections,
        content_height,
    })
}

// =============================================================================
// TESTS
// =============================================================================
