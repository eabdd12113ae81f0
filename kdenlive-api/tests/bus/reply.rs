//! Reply dumps as `dbus-send` prints them, decoded by the parser.

use crate::common::{render_reply, FakeKdenlive};
use kdenlive_api::bus::reply::parse;
use kdenlive_api::bus::tools::encode_dbus_send;
use kdenlive_api::bus::Transport;
use kdenlive_api::{Arg, RecordExt, RemoteValue};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = RemoteValue> {
    prop_oneof![
        "[a-zA-Z0-9 _.:/-]{0,12}".prop_map(RemoteValue::Str),
        any::<i64>().prop_map(RemoteValue::Int),
        (-1.0e6f64..1.0e6).prop_map(RemoteValue::Float),
        any::<bool>().prop_map(RemoteValue::Bool),
    ]
}

fn value() -> impl Strategy<Value = RemoteValue> {
    scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(RemoteValue::List),
            prop::collection::vec(("[a-z]{1,6}", inner), 1..4)
                .prop_map(|entries| RemoteValue::Map(entries.into_iter().collect())),
        ]
    })
}

fn arg_scalar() -> impl Strategy<Value = Arg> {
    prop_oneof![
        "[a-zA-Z_.-]{1,8}".prop_map(Arg::Str),
        any::<i32>().prop_map(Arg::from),
        (-1.0e6f64..1.0e6).prop_map(Arg::Float),
        any::<bool>().prop_map(Arg::Bool),
    ]
}

/// One argument of each sequence shape the encoder distinguishes, plus a scalar.
fn call_args() -> impl Strategy<Value = Vec<Arg>> {
    (
        prop::collection::vec(any::<i32>().prop_map(i64::from), 1..5),
        prop::collection::vec(arg_scalar(), 0..5),
        arg_scalar(),
    )
        .prop_map(|(ints, mixed, scalar)| {
            vec![Arg::List(vec![]), Arg::ints(ints), Arg::List(mixed), scalar]
        })
}

/// The value a service holds after receiving one `dbus-send` token.
fn received(token: &str) -> RemoteValue {
    let (kind, rest) = token.split_once(':').unwrap();
    if kind != "array" {
        return received_scalar(kind, rest);
    }
    let (element, body) = rest.split_once(':').unwrap();
    if body.is_empty() {
        return RemoteValue::List(vec![]);
    }
    RemoteValue::List(
        body.split(',')
            .map(|item| received_scalar(element, item))
            .collect(),
    )
}

fn received_scalar(kind: &str, text: &str) -> RemoteValue {
    match kind {
        "int32" => RemoteValue::Int(text.parse().unwrap()),
        "double" => RemoteValue::Float(text.parse().unwrap()),
        "boolean" => RemoteValue::Bool(text.parse().unwrap()),
        _ => RemoteValue::from(text),
    }
}

fn assert_coerces_to(sent: &Arg, got: &RemoteValue) -> Result<(), TestCaseError> {
    match sent {
        Arg::Int(n) => prop_assert_eq!(got.as_i64(), Some(*n)),
        Arg::Float(x) => prop_assert_eq!(got.as_f64(), Some(*x)),
        Arg::Bool(b) => prop_assert_eq!(got.as_bool(), *b),
        Arg::Str(s) => prop_assert_eq!(&got.to_text(), s),
        Arg::List(items) => {
            let RemoteValue::List(got_items) = got else {
                return Err(TestCaseError::fail(format!("expected a list, got {got:?}")));
            };
            prop_assert_eq!(got_items.len(), items.len());
            for (item, got_item) in items.iter().zip(got_items) {
                assert_coerces_to(item, got_item)?;
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_printed_replies_decode_to_the_sent_value(value in value()) {
        prop_assert_eq!(parse(&render_reply(&value)), value);
    }

    #[test]
    fn test_encoded_arguments_come_back_equal_after_coercion(args in call_args()) {
        let echoed: Vec<RemoteValue> = args
            .iter()
            .map(|arg| received(&encode_dbus_send(arg).unwrap()))
            .collect();

        let decoded = parse(&render_reply(&RemoteValue::List(echoed)));

        assert_coerces_to(&Arg::List(args), &decoded)?;
    }

    #[test]
    fn test_parser_never_panics_on_garbage(text in "(\\PC|\n){0,200}") {
        let _ = parse(&text);
    }
}

#[test]
fn test_track_listing_from_the_fake_decodes_to_records() {
    let fake = FakeKdenlive::new();
    let tracks = fake
        .call("org.kde.kdenlive-4242", "scriptGetAllTracksInfo", &[])
        .unwrap()
        .into_records();

    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[0].int("id"), Some(0));
    assert_eq!(tracks[0].text("name"), "V1");
    assert!(!tracks[0].flag("audio"));
    assert!(tracks[2].flag("audio"));
}

#[test]
fn test_string_ending_in_backslash_does_not_swallow_the_next_element() {
    let text = "array [\n   string \"C:\\media\\\"\n   string \"b.mp4\"\n]";

    assert_eq!(
        parse(text),
        RemoteValue::List(vec![
            RemoteValue::from("C:\\media\\"),
            RemoteValue::from("b.mp4"),
        ])
    );
}
