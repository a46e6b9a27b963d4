use proptest::prelude::*;
use vehicle_enquiry::models::LookupEvent;

/// Non-blank identifier without surrounding whitespace
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    "[A-Z0-9][A-Z0-9-]{0,16}"
}

/// Absent, blank, or populated
pub fn optional_identifier_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("   ".to_string())),
        identifier_strategy().prop_map(Some),
    ]
}

pub fn lookup_event_strategy() -> impl Strategy<Value = LookupEvent> {
    (
        optional_identifier_strategy(),
        optional_identifier_strategy(),
        optional_identifier_strategy(),
        optional_identifier_strategy(),
    )
        .prop_map(
            |(vehicle_reg_mark, vin_number, trailer_id, test_number)| LookupEvent {
                vehicle_reg_mark,
                vin_number,
                trailer_id,
                test_number,
            },
        )
}
