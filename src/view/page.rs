//! Static page skeleton and the mount points the board renders into.

use tracing::debug;

use crate::dom;
use crate::error::{BoardError, Result};
use crate::markup::create_element;
use crate::render::{render_node, RenderPosition};
use crate::types::NodeId;

pub const PAGE_MARKUP: &str = r#"<div class="page-body">
  <header class="page-header">
    <div class="page-body__container page-header__container">
      <img class="page-header__logo" src="img/logo.png" width="42" height="42" alt="Trip logo">
      <div class="trip-main">
        <div class="trip-main__trip-controls trip-controls">
          <div class="trip-controls__navigation">
            <h2 class="visually-hidden">Switch trip view</h2>
          </div>
          <div class="trip-controls__filters">
            <h2 class="visually-hidden">Filter events</h2>
          </div>
        </div>
        <button class="trip-main__event-add-btn btn btn--big btn--yellow" type="button">New event</button>
      </div>
    </div>
  </header>
  <main class="page-body__page-main page-main">
    <div class="page-body__container">
      <section class="trip-events">
        <h2 class="visually-hidden">Trip events</h2>
      </section>
    </div>
  </main>
</div>"#;

/// Node handles the content presenter renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardMounts {
    pub events_container: NodeId,
    pub route_container: NodeId,
    pub menu_container: NodeId,
    pub filters_container: NodeId,
    pub new_event_button: NodeId,
}

fn find(page: NodeId, class: &str) -> Result<NodeId> {
    dom::query_class(page, class).ok_or_else(|| BoardError::MissingMount(class.to_string()))
}

impl BoardMounts {
    /// Look up every mount point under `page`.
    pub fn from_page(page: NodeId) -> Result<Self> {
        Ok(Self {
            events_container: find(page, "trip-events")?,
            route_container: find(page, "trip-main")?,
            menu_container: find(page, "trip-controls__navigation")?,
            filters_container: find(page, "trip-controls__filters")?,
            new_event_button: find(page, "trip-main__event-add-btn")?,
        })
    }
}

/// Build the page skeleton, attach it to the document root and return its
/// mount points.
pub fn mount_page() -> Result<BoardMounts> {
    let page = create_element(PAGE_MARKUP)?;
    render_node(page, dom::root(), RenderPosition::Append)?;
    debug!(page = %page, "page mounted");
    BoardMounts::from_page(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{has_class, is_connected, reset_document};

    #[test]
    fn test_mount_page() {
        reset_document();
        let mounts = mount_page().unwrap();
        assert!(is_connected(mounts.events_container));
        assert!(has_class(mounts.route_container, "trip-main"));
        assert!(has_class(mounts.new_event_button, "btn--yellow"));
        assert_ne!(mounts.menu_container, mounts.filters_container);
    }

    #[test]
    fn test_missing_mount() {
        reset_document();
        let page = create_element(r#"<div class="trip-main"></div>"#).unwrap();
        assert!(matches!(
            BoardMounts::from_page(page),
            Err(BoardError::MissingMount(class)) if class == "trip-events"
        ));
    }
}
