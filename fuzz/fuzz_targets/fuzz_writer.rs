#![no_main]
use arbitrary::Arbitrary;
use datamodem::{DataWriter, UtfVariant, WriteError, WriterOptions};
use libfuzzer_sys::fuzz_target;

/// One call against the writer's public surface.
#[derive(Arbitrary, Debug)]
enum Op {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Raw(Vec<u8>),
    Utf(String),
    InternedUtf(String),
    Flush,
}

#[derive(Arbitrary, Debug)]
struct Case {
    four_byte: bool,
    capacity_a: u16,
    capacity_b: u16,
    ops: Vec<Op>,
}

// Staging capacity must never leak into the wire format: the same op
// sequence through two arbitrarily sized buffers has to produce identical
// sink bytes, with every error surfacing at the same op index.
fuzz_target!(|case: Case| {
    let variant = if case.four_byte {
        UtfVariant::FourByte
    } else {
        UtfVariant::ThreeByte
    };
    let a = run(&case.ops, variant, usize::from(case.capacity_a.max(8)));
    let b = run(&case.ops, variant, usize::from(case.capacity_b.max(8)));
    assert_eq!(a, b, "wire output depended on staging capacity");
});

type Outcome = (Vec<u8>, Vec<Option<WriteError<std::convert::Infallible>>>);

fn run(ops: &[Op], variant: UtfVariant, capacity: usize) -> Outcome {
    let mut out = Vec::new();
    let mut writer = DataWriter::new(&mut out, WriterOptions {
        buffer_capacity: capacity,
        utf_variant: variant,
    });
    let mut errors = Vec::with_capacity(ops.len());
    for op in ops {
        let result = match op {
            Op::Bool(v) => writer.write_bool(*v),
            Op::U8(v) => writer.write_u8(*v),
            Op::I8(v) => writer.write_i8(*v),
            Op::U16(v) => writer.write_u16(*v),
            Op::I16(v) => writer.write_i16(*v),
            Op::I32(v) => writer.write_i32(*v),
            Op::I64(v) => writer.write_i64(*v),
            Op::F32(v) => writer.write_f32(*v),
            Op::F64(v) => writer.write_f64(*v),
            Op::Raw(bytes) => writer.write_all(bytes),
            Op::Utf(s) => writer.write_utf(s),
            Op::InternedUtf(s) => writer.write_interned_utf(s),
            Op::Flush => writer.flush(),
        };
        errors.push(result.err());
    }
    writer.flush().expect("vec sink cannot fail");
    writer.release();
    (out, errors)
}
