#![allow(missing_docs)]

use bitform::{
    decode_strategy, deserialize, encode_strategy, serialize, BitformError, Bits, Decode,
    Encode, Reflect, Spare, Strategy,
};

#[derive(Debug, Default, PartialEq, Encode, Decode, Reflect)]
#[repr(C)]
struct Trio {
    a: u32,
    b: bool,
    c: i8,
}

#[derive(Debug, Default, PartialEq, Encode, Decode, Reflect)]
struct Empty {}

#[derive(Debug, Default, PartialEq, Encode, Decode, Reflect)]
struct Unit;

#[derive(Debug, Default, PartialEq, Encode, Decode, Reflect)]
struct Pair(u16, i16);

#[derive(Default, Reflect)]
#[allow(dead_code)]
struct Large {
    x00: i32,
    x01: i32,
    x02: i32,
    x03: i32,
    x04: i32,
    x05: i32,
    x06: i32,
    x07: i32,
    x08: i32,
    x09: i32,
    x10: i32,
    x11: i32,
    x12: i32,
    x13: i32,
    x14: i32,
    x15: i32,
    x16: i32,
    x17: i32,
    x18: i32,
    x19: i32,
    x20: i32,
    x21: i32,
    x22: i32,
    x23: i32,
    x24: i32,
    x25: i32,
    x26: i32,
    x27: i32,
    x28: i32,
    x29: i32,
}

#[derive(Debug, Default, PartialEq, Encode, Decode, Reflect)]
struct Flags {
    spare: Spare<4>,
    a: Bits<u8, 2>,
    b: Bits<u8, 2>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[repr(u8)]
enum Mode {
    #[default]
    Idle = 0,
    Run = 3,
    Halt = 0x80,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[repr(i16)]
enum Level {
    Low = -100,
    #[default]
    Zero = 0,
    High = 100,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[repr(usize)]
enum Slot {
    #[default]
    First = 1,
    Last = usize::MAX,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[repr(isize)]
enum Offset {
    Back = -1,
    #[default]
    Here = 0,
}

#[derive(Debug, Default, PartialEq, Encode, Decode)]
struct Session {
    mode: Mode,
    level: Level,
    #[bitform(skip)]
    cache: Vec<u8>,
    ticks: u32,
}

#[derive(Debug, Default, PartialEq, Encode, Decode)]
struct Tagged<T> {
    tag: u8,
    value: T,
}

// --- FIELD ENUMERATION ---

#[test]
fn test_field_count() {
    assert_eq!(Trio::FIELD_COUNT, 3);
    assert_eq!(Empty::FIELD_COUNT, 0);
    assert_eq!(Unit::FIELD_COUNT, 0);
    assert_eq!(Pair::FIELD_COUNT, 2);
    assert_eq!(Flags::FIELD_COUNT, 3);
    assert_eq!(Large::FIELD_COUNT, 30);
    assert_eq!(Large::layout().len(), 30);
}

#[test]
fn test_field_offsets() {
    let layout = Trio::layout();
    assert_eq!(layout.offsets(), [0, 4, 5]);
    assert!(layout.is_natural());

    let b = layout.field("b").expect("field b");
    assert_eq!((b.offset, b.size, b.align), (4, 1, 1));
}

#[test]
fn test_tuple_and_empty_layouts() {
    let pair = Pair::layout();
    let names: Vec<_> = pair.fields().iter().map(|f| f.name).collect();
    assert_eq!(names, ["0", "1"]);
    assert!(Empty::layout().is_empty());
    assert!(Unit::layout().is_empty());
}

// --- COMPOSITES ---

#[test]
fn test_empty_composites_write_nothing() -> bitform::Result<()> {
    assert!(serialize(&Empty {})?.is_empty());
    assert!(serialize(&Unit)?.is_empty());
    assert_eq!(deserialize::<Unit>(&[])?, Unit);
    Ok(())
}

#[test]
fn test_tuple_struct_round_trip() -> bitform::Result<()> {
    let pair = Pair(0xBEEF, -2);
    let bytes = serialize(&pair)?;
    assert_eq!(bytes, [0xBE, 0xEF, 0xFF, 0xFE]);
    assert_eq!(deserialize::<Pair>(&bytes)?, pair);
    Ok(())
}

#[test]
fn test_skipped_field_is_not_on_the_wire() -> bitform::Result<()> {
    let session = Session {
        mode: Mode::Run,
        level: Level::Low,
        cache: vec![1, 2, 3],
        ticks: 10,
    };
    let bytes = serialize(&session)?;
    assert_eq!(bytes, [0x03, 0xFF, 0x9C, 0x00, 0x00, 0x00, 0x0A]);

    let back: Session = deserialize(&bytes)?;
    assert!(back.cache.is_empty());
    assert_eq!(back.mode, Mode::Run);
    assert_eq!(back.level, Level::Low);
    assert_eq!(back.ticks, 10);
    Ok(())
}

#[test]
fn test_generic_composite() -> bitform::Result<()> {
    let tagged = Tagged {
        tag: 1,
        value: vec![String::from("a"), String::from("bc")],
    };
    let bytes = serialize(&tagged)?;
    assert_eq!(deserialize::<Tagged<Vec<String>>>(&bytes)?, tagged);
    Ok(())
}

// --- ENUMERATIONS ---

#[test]
fn test_enum_uses_repr_width() -> bitform::Result<()> {
    assert_eq!(serialize(&Mode::Halt)?, [0x80]);
    assert_eq!(serialize(&Level::High)?, [0x00, 0x64]);
    assert_eq!(deserialize::<Level>(&[0xFF, 0x9C])?, Level::Low);
    Ok(())
}

#[test]
fn test_pointer_sized_repr() -> bitform::Result<()> {
    let width = (usize::BITS / 8) as usize;

    let bytes = serialize(&Slot::Last)?;
    assert_eq!(bytes, vec![0xFF; width]);
    assert_eq!(deserialize::<Slot>(&bytes)?, Slot::Last);

    let bytes = serialize(&Offset::Back)?;
    assert_eq!(bytes, vec![0xFF; width]);
    assert_eq!(deserialize::<Offset>(&bytes)?, Offset::Back);
    assert_eq!(deserialize::<Slot>(&serialize(&1usize)?)?, Slot::First);
    Ok(())
}

#[test]
fn test_unknown_discriminant_is_rejected() {
    let err = deserialize::<Mode>(&[0x02]).unwrap_err();
    match err {
        BitformError::InvalidDiscriminant { type_name, raw } => {
            assert!(type_name.ends_with("Mode"));
            assert_eq!(raw, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// --- STRATEGIES ---

#[test]
fn test_resolved_strategies() {
    assert_eq!(encode_strategy::<Trio>(), Strategy::Composite);
    assert_eq!(decode_strategy::<Mode>(), Strategy::Enumeration);
    assert_eq!(encode_strategy::<u16>(), Strategy::Integer);
    assert_eq!(encode_strategy::<bool>(), Strategy::Integer);
    assert_eq!(encode_strategy::<f64>(), Strategy::Float);
    assert_eq!(encode_strategy::<String>(), Strategy::Collection);
    assert_eq!(encode_strategy::<str>(), Strategy::Collection);
    assert_eq!(decode_strategy::<[u8; 4]>(), Strategy::FixedCollection);
    assert_eq!(encode_strategy::<Bits<u8, 3>>(), Strategy::BitField);
    assert_eq!(encode_strategy::<Spare<3>>(), Strategy::Spare);
    assert_eq!(encode_strategy::<Box<Trio>>(), Strategy::Composite);
}

const _: () = bitform::assert_codec::<Session>();
const _: () = bitform::assert_codec::<Tagged<[Mode; 2]>>();
