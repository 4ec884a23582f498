//! Invariants of the binding state machine, checked over event sequences.

use chrono::NaiveTime;

use docbind_bindings::{
    Binding, BindingDefaults, FieldBinding, Notice, Phase, RangeGesture, RangeSlider, Slider,
    SliderGesture, Text, TextField, TextGesture, Thumb, TimeField, TimeGesture, TimeRangeField,
    TimeRangeGesture, ValueTransform,
};
use docbind_core_store::{field, DocRef, Error, FieldPath, Snapshot, Value};

fn snapshot(version: u64, path: &str, value: Option<Value>) -> Snapshot {
    let mut data = Value::map();
    if let Some(value) = value {
        data.set(&field!(path), value).unwrap();
    }
    Snapshot::new(DocRef::new("clients", "alice"), version, data)
}

fn remote_values() -> Vec<Option<Value>> {
    vec![
        Some(Value::from("Alice")),
        None,
        Some(Value::from("")),
        Some(Value::Integer(7)),
        Some(Value::Null),
        Some(Value::from("Carol")),
    ]
}

#[test]
fn test_viewing_display_is_transformed_remote() {
    let mut binding = FieldBinding::new(field!("name"), Text);
    for (version, value) in remote_values().into_iter().enumerate() {
        let snap = snapshot(version as u64, "name", value);
        let step = binding.observe(&snap);
        assert_eq!(step.phase, Phase::Viewing);
        let expected = Text.to_display(snap.field(&field!("name")));
        assert_eq!(binding.display(), expected);
    }
}

#[test]
fn test_resync_after_any_edit_session() {
    let mut text = TextField::new(field!("name"));
    let _ = text.observe(&snapshot(1, "name", Some(Value::from("Alice"))));

    let sessions: Vec<Vec<TextGesture>> = vec![
        vec![TextGesture::Focus, TextGesture::Key("Escape".into())],
        vec![TextGesture::Input("x".into()), TextGesture::Blur],
        vec![
            TextGesture::Input("Bob".into()),
            TextGesture::Key("Enter".into()),
        ],
    ];
    for (n, session) in sessions.into_iter().enumerate() {
        for gesture in session {
            let _ = text.gesture(gesture);
        }
        if text.phase() == Phase::Submitting {
            let _ = text.settle(Ok(()));
        }
        let remote = format!("remote-{}", n);
        let _ = text.observe(&snapshot(10 + n as u64, "name", Some(Value::from(remote.as_str()))));
        assert_eq!(text.phase(), Phase::Viewing);
        assert_eq!(text.view().value, remote);
    }
}

#[test]
fn test_suppression_in_every_busy_phase() {
    let mut text = TextField::new(field!("name"));
    let _ = text.observe(&snapshot(1, "name", Some(Value::from("Alice"))));
    let _ = text.gesture(TextGesture::Input("Bob".into()));

    for (version, value) in remote_values().into_iter().enumerate() {
        let step = text.observe(&snapshot(2 + version as u64, "name", value));
        assert_eq!(step.notice, Notice::Suppressed);
        assert_eq!(text.view().value, "Bob");
    }

    let _ = text.gesture(TextGesture::Key("Enter".into()));
    assert_eq!(text.phase(), Phase::Submitting);
    for (version, value) in remote_values().into_iter().enumerate() {
        let step = text.observe(&snapshot(20 + version as u64, "name", value));
        assert_eq!(step.notice, Notice::Suppressed);
        assert_eq!(text.view().value, "Bob");
    }
}

#[test]
fn test_slider_suppresses_while_dragging_and_submitting() {
    let mut slider = Slider::new(field!("level"), 0.0, 10.0).unwrap();
    let _ = slider.observe(&snapshot(1, "level", Some(Value::Integer(2))));
    let _ = slider.gesture(SliderGesture::Drag(4.0));
    let _ = slider.observe(&snapshot(2, "level", Some(Value::Integer(9))));
    assert_eq!(slider.view().index, 4.0);

    let _ = slider.gesture(SliderGesture::Release);
    let _ = slider.observe(&snapshot(3, "level", Some(Value::Integer(1))));
    assert_eq!(slider.view().index, 4.0);

    let _ = slider.settle(Ok(()));
    assert_eq!(slider.view().index, 1.0);
}

#[test]
fn test_revert_is_idempotent() {
    let mut text = TextField::new(field!("name"));
    let _ = text.observe(&snapshot(1, "name", Some(Value::from("Alice"))));

    for _ in 0..3 {
        let step = text.gesture(TextGesture::Key("Escape".into()));
        assert_eq!(step.notice, Notice::Idle);
        assert_eq!(text.view().value, "Alice");
    }

    for buffer in ["", "Bob", "Alice"] {
        let _ = text.gesture(TextGesture::Input(buffer.into()));
        let _ = text.gesture(TextGesture::Key("Escape".into()));
        assert_eq!(text.phase(), Phase::Viewing);
        assert_eq!(text.view().value, "Alice");
    }
}

#[test]
fn test_commit_guard_never_writes() {
    let mut binding = FieldBinding::new(field!("name"), Text);
    let _ = binding.observe(&snapshot(1, "name", Some(Value::from("Alice"))));

    let _ = binding.change("Alice".into());
    assert!(!binding.commit(true).has_writes());
    let _ = binding.change("Bob".into());
    assert!(!binding.commit(false).has_writes());
    assert!(!binding.runner().is_running());

    // Equal to the latest remote, even if that arrived mid-edit.
    let _ = binding.observe(&snapshot(2, "name", Some(Value::from("Bob"))));
    assert_eq!(binding.commit(true).notice, Notice::Unchanged);
}

#[test]
fn test_range_distance_holds_after_every_commit() {
    let path = |p: &str| FieldPath::parse(p).unwrap();
    let drags = [
        (Thumb::Start, 48.0),
        (Thumb::End, 3.0),
        (Thumb::Start, 100.0),
        (Thumb::End, 55.5),
        (Thumb::Start, -20.0),
        (Thumb::End, 0.0),
    ];

    let mut slider = RangeSlider::new(Some(path("low")), path("high"), 0.0, 100.0, 5.0).unwrap();
    let mut data = Value::map();
    data.set(&path("low"), Value::Integer(10)).unwrap();
    data.set(&path("high"), Value::Integer(50)).unwrap();
    let _ = slider.observe(&Snapshot::new(DocRef::new("clients", "alice"), 1, data.clone()));

    for (n, (thumb, index)) in drags.into_iter().enumerate() {
        let _ = slider.gesture(RangeGesture::Drag { thumb, index });
        let step = slider.gesture(RangeGesture::Release);
        for write in &step.writes {
            data.set(&write.path, write.value.clone()).unwrap();
        }
        let _ = slider.observe(&Snapshot::new(
            DocRef::new("clients", "alice"),
            2 + n as u64,
            data.clone(),
        ));
        if step.has_writes() {
            let _ = slider.settle(Ok(()));
        }

        let low = data.get(&path("low")).and_then(Value::as_f64).unwrap();
        let high = data.get(&path("high")).and_then(Value::as_f64).unwrap();
        assert!(high - low >= 5.0, "stored [{}, {}]", low, high);
        let view = slider.view();
        assert!(view.end - view.start >= 5.0);
    }
}

#[test]
fn test_transformed_fields_are_busy_while_writing() {
    let defaults = BindingDefaults::default();
    let pick = |h| TimeGesture::Pick(NaiveTime::from_hms_opt(h, 0, 0));

    let mut time = TimeField::new(field!("hour"), &defaults);
    let _ = time.observe(&snapshot(1, "hour", Some(Value::Integer(6))));
    assert!(time.gesture(pick(7)).has_writes());
    assert_eq!(time.gesture(pick(8)).notice, Notice::Busy);
    let _ = time.settle(Err(Error::transport("offline")));
    assert_eq!(time.phase(), Phase::Viewing);
    assert_eq!(time.view().error.as_deref(), Some("transport error: offline"));
    assert!(time.gesture(pick(8)).has_writes());

    let mut range = TimeRangeField::new(field!("window"), &defaults).unwrap();
    let _ = range.observe(&snapshot(
        1,
        "window",
        Some(Value::Array(vec![Value::Integer(480), Value::Integer(1320)])),
    ));
    let change = TimeRangeGesture::Change {
        start: NaiveTime::from_hms_opt(9, 0, 0),
        end: None,
    };
    assert!(range.gesture(change).has_writes());
    assert_eq!(range.gesture(change).notice, Notice::Busy);
}
