use super::*;

use client_core::{Notice, Phase};
use shared::{
    domain::{NewProperty, PropertyId},
    error::ErrorKind,
};

fn listed(id: i64, address: &str, city: &str) -> Property {
    NewProperty {
        address: address.into(),
        city: city.into(),
        zip: "00000".into(),
        location_code: "SPR".into(),
        size_sqft: 1200.0,
        base_price_usd: 250_000.0,
    }
    .into_property(
        PropertyId(id),
        "2024-05-01T10:00:00Z".parse().expect("timestamp"),
    )
}

fn loaded(properties: Vec<Property>) -> ViewState {
    ViewState {
        properties: Some(properties),
        ..ViewState::default()
    }
}

#[test]
fn first_load_shows_loading() {
    assert_eq!(render(&ViewState::default(), RenderOptions::default()), "Loading…\n");
}

#[test]
fn pending_refresh_shows_loading_over_stale_table() {
    let mut state = loaded(vec![listed(1, "1 Main St", "Springfield")]);
    state.phase = Phase::Pending(Operation::Refresh);
    assert_eq!(render(&state, RenderOptions::default()), "Loading…\n");
}

#[test]
fn empty_list_says_so() {
    assert_eq!(
        render(&loaded(Vec::new()), RenderOptions::default()),
        "No properties found.\n"
    );
}

#[test]
fn table_rows_follow_list_order() {
    let state = loaded(vec![
        listed(2, "2 Elm St", "Shelbyville"),
        listed(1, "1 Main St", "Springfield"),
    ]);
    let rendered = render(&state, RenderOptions::default());
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("ID | Address"));
    assert!(lines[0].ends_with("Listed At"));
    assert!(lines[1].starts_with("-- | --------"));
    assert!(lines[2].starts_with("2  | 2 Elm St  | Shelbyville"));
    assert!(lines[3].starts_with("1  | 1 Main St | Springfield"));

    let date = format_listing_date(&state.properties.as_ref().expect("loaded")[0].listing_date);
    assert!(lines[2].ends_with(&date));
    assert!(!rendered.contains("Location"));
}

#[test]
fn detailed_table_adds_listing_columns() {
    let state = loaded(vec![listed(1, "1 Main St", "Springfield")]);
    let rendered = render(&state, RenderOptions { detailed: true });

    assert!(rendered.contains("Location"));
    assert!(rendered.contains("Size (ft²)"));
    assert!(rendered.contains("SPR"));
    assert!(rendered.contains("1200"));
    assert!(rendered.contains("250000.00"));
}

#[test]
fn error_notice_is_shown_verbatim_above_last_list() {
    let mut state = loaded(vec![listed(1, "1 Main St", "Springfield")]);
    state.notice = Some(Notice {
        kind: ErrorKind::Service,
        message: "service error: connection refused".into(),
    });
    let rendered = render(&state, RenderOptions::default());

    assert!(rendered.starts_with("Error: service error: connection refused\n"));
    assert!(rendered.contains("1 Main St"));
}

#[test]
fn failed_first_load_shows_only_the_error() {
    let state = ViewState {
        notice: Some(Notice {
            kind: ErrorKind::Service,
            message: "service error: connection refused".into(),
        }),
        ..ViewState::default()
    };
    assert_eq!(
        render(&state, RenderOptions::default()),
        "Error: service error: connection refused\n"
    );
}

#[test]
fn created_notice_names_the_new_id() {
    let mut state = loaded(vec![listed(7, "1 Main St", "Springfield")]);
    state.last_created = Some(PropertyId(7));
    assert!(render(&state, RenderOptions::default()).starts_with("Created property with ID: 7\n"));
}

#[test]
fn created_id_survives_a_failed_follow_up_refresh() {
    let state = ViewState {
        last_created: Some(PropertyId(42)),
        notice: Some(Notice {
            kind: ErrorKind::Service,
            message: "service error: connection reset".into(),
        }),
        ..ViewState::default()
    };
    assert_eq!(
        render(&state, RenderOptions::default()),
        "Created property with ID: 42\nError: service error: connection reset\n"
    );
}

#[test]
fn draft_marks_missing_required_fields() {
    let draft = Draft::new()
        .with(DraftField::Address, "1 Main St")
        .with(DraftField::SizeSqft, "900");
    let rendered = render_draft(&draft);

    assert!(rendered.contains("address        : 1 Main St\n"));
    assert!(rendered.contains("city           :   (required)\n"));
    assert!(rendered.contains("zip            :   (required)\n"));
    assert!(rendered.contains("size_sqft      : 900\n"));
    assert!(rendered.contains("location_code  : \n"));
}
