//! Board-level behavior through the public API.

use std::rc::Rc;

use chrono::{TimeZone, Utc};
use trip_board::dom::{self, query_class, query_class_all, query_tag, reset_document};
use trip_board::events::keyboard::{self, listener_count, reset_keyboard_state};
use trip_board::events::reset_interaction_state;
use trip_board::{
    click, create_element, markup, mount_page, render_node, replace_node, submit, BoardConfig,
    BoardError, ContentPresenter, Destination, EditorPolicy, EventType, KeyboardEvent, Offer,
    PointMode, PointsModel, RenderPosition, Waypoint,
};

fn setup() {
    reset_document();
    reset_interaction_state();
    reset_keyboard_state();
}

fn waypoint(index: usize) -> Waypoint {
    let from = Utc.with_ymd_and_hms(2026, 3, 10 + index as u32, 9, 0, 0).unwrap();
    Waypoint::new(
        index.to_string(),
        EventType::ALL[index % EventType::ALL.len()],
        Destination::new(format!("City {index}"), ""),
        from,
        from + chrono::TimeDelta::hours(3),
        50 + index as u32,
    )
    .unwrap()
}

fn board(count: usize, config: BoardConfig) -> ContentPresenter {
    setup();
    let mounts = mount_page().unwrap();
    let model = PointsModel::new((0..count).map(waypoint).collect());
    let presenter = ContentPresenter::new(mounts, Rc::new(model), config);
    presenter.init().unwrap();
    presenter
}

fn rollup(presenter: &ContentPresenter, id: &str) -> trip_board::NodeId {
    let node = presenter.point_node(id).unwrap();
    query_class(node, "event__rollup-btn").unwrap()
}

#[test]
fn test_serialized_markup_reparses_to_same_structure() {
    setup();
    let node = create_element(
        r#"<li class="trip-events__item"><p class="event__price">&euro;&nbsp;<span>20</span></p><img src="a.png" alt="x"><br></li>"#,
    )
    .unwrap();
    let markup_once = markup::serialize(node);
    let reparsed = create_element(&markup_once).unwrap();
    assert_eq!(markup::serialize(reparsed), markup_once);
}

#[test]
fn test_replace_takes_sibling_slot() {
    setup();
    let list = create_element("<ul><li>a</li><li>b</li><li>c</li></ul>").unwrap();
    render_node(list, dom::root(), RenderPosition::Append).unwrap();
    let old = dom::children(list)[1];
    let new = create_element("<li>form</li>").unwrap();

    replace_node(new, old).unwrap();
    assert_eq!(dom::child_index(new), Some(1));
    assert_eq!(dom::parent(new), Some(list));
    assert_eq!(dom::parent(old), None);
    assert!(dom::exists(old));
}

#[test]
fn test_initial_batch_then_reveal_one() {
    let presenter = board(8, BoardConfig::default());
    let list = presenter.events_list_node().unwrap();
    assert_eq!(dom::children(list).len(), 6);
    assert_eq!(presenter.revealed_count(), 6);

    click(presenter.mounts().new_event_button);
    assert_eq!(presenter.revealed_count(), 7);
    let ids = presenter.revealed_ids();
    assert_eq!(ids[6], "6");
    let last = dom::children(list)[6];
    let title = query_class(last, "event__title").unwrap();
    assert_eq!(dom::text_content(title), "Check-in City 6");
}

#[test]
fn test_empty_model_renders_placeholder() {
    let presenter = board(0, BoardConfig::default());
    let page = dom::children(dom::root())[0];
    assert_eq!(query_class_all(page, "trip-events__msg").len(), 1);
    assert!(query_class(page, "trip-events__list").is_none());
    assert_eq!(presenter.revealed_count(), 0);
}

#[test]
fn test_edit_then_submit_restores_waypoint() {
    let presenter = board(8, BoardConfig::default());
    let card = presenter.point_node("2").unwrap();
    let index = dom::child_index(card);

    click(rollup(&presenter, "2"));
    assert_eq!(presenter.point_mode("2"), Some(PointMode::Editing));
    assert_eq!(listener_count(), 1);
    let form_item = presenter.point_node("2").unwrap();
    assert_eq!(dom::child_index(form_item), index);

    submit(query_tag(form_item, "form").unwrap());
    assert_eq!(presenter.point_node("2"), Some(card));
    assert_eq!(dom::child_index(card), index);
    assert_eq!(listener_count(), 0);
}

#[test]
fn test_edit_then_cancel_key_restores_waypoint() {
    let presenter = board(8, BoardConfig::default());
    let card = presenter.point_node("4").unwrap();

    click(rollup(&presenter, "4"));
    keyboard::dispatch(KeyboardEvent::new("Esc"));

    assert_eq!(presenter.point_mode("4"), Some(PointMode::Display));
    assert_eq!(presenter.point_node("4"), Some(card));
    assert!(dom::is_connected(card));
    assert_eq!(listener_count(), 0);
}

#[test]
fn test_configured_cancel_key() {
    let config = BoardConfig {
        cancel_keys: vec!["x".to_string()],
        ..BoardConfig::default()
    };
    let presenter = board(3, config);

    click(rollup(&presenter, "0"));
    keyboard::dispatch(KeyboardEvent::new("Escape"));
    assert_eq!(presenter.point_mode("0"), Some(PointMode::Editing));
    keyboard::dispatch(KeyboardEvent::new("x"));
    assert_eq!(presenter.point_mode("0"), Some(PointMode::Display));
}

#[test]
fn test_editor_policies() {
    let concurrent = board(8, BoardConfig::default());
    click(rollup(&concurrent, "0"));
    click(rollup(&concurrent, "1"));
    assert_eq!(concurrent.open_editors(), 2);

    let single = board(
        8,
        BoardConfig {
            editor_policy: EditorPolicy::Single,
            ..BoardConfig::default()
        },
    );
    click(rollup(&single, "0"));
    click(rollup(&single, "1"));
    assert_eq!(single.open_editors(), 1);
    assert_eq!(single.point_mode("0"), Some(PointMode::Display));
}

#[test]
fn test_unchecked_offers_are_hidden() {
    setup();
    let mounts = mount_page().unwrap();
    let point = waypoint(0).with_offers(vec![
        Offer::new("Order Uber", 20, false),
        Offer::new("Add luggage", 30, true),
        Offer::new("Add meal", 15, true),
    ]);
    let presenter = ContentPresenter::new(
        mounts,
        Rc::new(PointsModel::new(vec![point])),
        BoardConfig::default(),
    );
    presenter.init().unwrap();

    let card = presenter.point_node("0").unwrap();
    let titles: Vec<String> = query_class_all(card, "event__offer-title")
        .into_iter()
        .map(dom::text_content)
        .collect();
    assert_eq!(titles, vec!["Add luggage", "Add meal"]);
}

#[test]
fn test_shared_point_id_is_rejected() {
    setup();
    let mounts = mount_page().unwrap();
    let mut twin = waypoint(2);
    twin.id = "1".to_string();
    let model = PointsModel::new(vec![waypoint(0), waypoint(1), twin]);
    let presenter = ContentPresenter::new(mounts, Rc::new(model), BoardConfig::default());

    let err = presenter.init().unwrap_err();
    assert!(matches!(err, BoardError::DuplicatePointId(ref id) if id == "1"));
    assert!(presenter.point_node("1").is_none());
    assert_eq!(listener_count(), 0);
    assert!(query_class(mounts.events_container, "trip-events__list").is_none());
}
