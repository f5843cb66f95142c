use crate::compare::check::CheckResult;
use crate::core::reader::WireReader;
use crate::error::{constants, Result, WireError};
use crate::schema::field::{decode_field, Encoding, FieldSpec};
use crate::schema::messages::Explosion;
use crate::schema::registry::{lookup, LengthRule, OpcodeSchema, Semantics};
use crate::schema::trailing::{
    BeamTrailing, TorpedoMode, BEAM_MORE_FLAGS_OFFSET, BEAM_TARGET_LEN, FIRE_HEADER_LEN,
    TORPEDO_FLAGS_OFFSET, TORPEDO_TARGET_LEN,
};
use crate::schema::DirtyFlags;
use crate::utils::hex::hex_string;

/// Compare `payload` against the schema registered for its opcode.
pub fn compare(payload: &[u8], reference: Option<&[u8]>) -> Result<Vec<CheckResult>> {
    let opcode = *payload
        .first()
        .ok_or_else(|| WireError::Custom(constants::ERR_EMPTY_PAYLOAD.to_string()))?;
    let schema = lookup(opcode).ok_or(WireError::UnknownOpcode(opcode))?;
    Ok(compare_payload(payload, schema, reference))
}

/// Structural checks of one captured payload against `schema`, optionally
/// alongside a reference payload of the same opcode.
///
/// Values of a field are expected to differ between captures (object ids,
/// vectors), so field checks assert position and type, not equality. The
/// result is ordered: opcode byte, length, field walk, opcode-specific checks.
pub fn compare_payload(
    payload: &[u8],
    schema: &OpcodeSchema,
    reference: Option<&[u8]>,
) -> Vec<CheckResult> {
    let mut checks = Vec::new();

    match payload.first() {
        Some(&b) => checks.push(CheckResult::new(
            "Opcode byte",
            b == schema.opcode,
            format!("0x{b:02X} == 0x{:02X}", schema.opcode),
        )),
        None => checks.push(CheckResult::fail("Opcode byte", "empty payload")),
    }

    check_length(&mut checks, payload, schema, reference);
    walk_fields(&mut checks, payload, schema, reference);

    match schema.semantics {
        Semantics::Plain => {}
        Semantics::BeamFire => beam_fire_checks(&mut checks, payload, reference),
        Semantics::TorpedoFire => torpedo_fire_checks(&mut checks, payload, reference),
        Semantics::Explosion => explosion_checks(&mut checks, payload, reference),
        Semantics::StateUpdate => state_update_checks(&mut checks, payload),
    }

    checks
}

fn check_length(
    checks: &mut Vec<CheckResult>,
    payload: &[u8],
    schema: &OpcodeSchema,
    reference: Option<&[u8]>,
) {
    let len = payload.len();
    match schema.length {
        LengthRule::Exact(n) => {
            checks.push(CheckResult::new(
                "Exact length",
                len == n,
                format!("ours={len} expected={n}"),
            ));
            if let Some(r) = reference {
                checks.push(CheckResult::new(
                    "Ref length match",
                    len == r.len(),
                    format!("ours={len} ref={}", r.len()),
                ));
            }
        }
        LengthRule::Minimum(n) => checks.push(CheckResult::new(
            "Min length",
            len >= n,
            format!("ours={len} >= {n}"),
        )),
    }
}

fn walk_fields(
    checks: &mut Vec<CheckResult>,
    payload: &[u8],
    schema: &OpcodeSchema,
    reference: Option<&[u8]>,
) {
    for (offset, field) in schema.fixed_fields() {
        let width = field.width();
        if offset + width > payload.len() {
            checks.push(CheckResult::fail(
                format!("{} present", field.name),
                format!("payload too short at offset {offset}"),
            ));
            break;
        }

        let label = format!("{} @ offset {offset}", field.name);
        let ours = &payload[offset..offset + width];
        let detail = match reference.and_then(|r| r.get(offset..offset + width)) {
            Some(theirs) => describe_pair(field, ours, theirs),
            None => format!("present ({width}B {})", field.encoding),
        };
        checks.push(CheckResult::pass(label, detail));
    }
}

fn describe_pair(field: &FieldSpec, ours: &[u8], theirs: &[u8]) -> String {
    let value = |bytes: &[u8]| {
        decode_field(&mut WireReader::new(bytes), field)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| hex_string(bytes))
    };
    match field.encoding {
        Encoding::I32 => format!("ours={} ref={} (both LE i32)", value(ours), value(theirs)),
        Encoding::F32 => format!("ours={} ref={} (both LE f32)", value(ours), value(theirs)),
        e if e.is_compressed() => format!(
            "{}B {e}: ours={} ref={} ({} vs {})",
            e.width(),
            hex_string(ours),
            hex_string(theirs),
            value(ours),
            value(theirs)
        ),
        _ => format!("ours={} ref={}", value(ours), value(theirs)),
    }
}

fn read_object_id(payload: &[u8], offset: usize) -> Option<String> {
    let mut r = WireReader::at(payload, offset);
    r.read_i32().ok().map(|id| format!("0x{:08X}", id as u32))
}

fn beam_fire_checks(checks: &mut Vec<CheckResult>, payload: &[u8], reference: Option<&[u8]>) {
    let Some(&more_flags) = payload.get(BEAM_MORE_FLAGS_OFFSET) else {
        return;
    };
    let has_target = BeamTrailing::has_target(more_flags);
    let trailing = payload.len().saturating_sub(FIRE_HEADER_LEN);

    if has_target && trailing >= BEAM_TARGET_LEN {
        if let Some(id) = read_object_id(payload, FIRE_HEADER_LEN) {
            checks.push(CheckResult::pass(
                format!("target_id @ offset {FIRE_HEADER_LEN}"),
                format!("ours={id} (4B LE i32)"),
            ));
        }
    }

    let expected = BeamTrailing::expected(more_flags);
    checks.push(CheckResult::new(
        "trailing length",
        expected.accepts(trailing),
        format!("more_flags=0x{more_flags:02X} has_target={has_target} expects {expected}, found {trailing}B"),
    ));

    let Some(r) = reference else { return };
    let Some(&ref_more) = r.get(BEAM_MORE_FLAGS_OFFSET) else {
        return;
    };
    let ref_has = BeamTrailing::has_target(ref_more);
    checks.push(CheckResult::new(
        "has_target bit match",
        has_target == ref_has,
        format!("ours={} ref={}", u8::from(has_target), u8::from(ref_has)),
    ));
    // Lengths are only comparable when both carry the same trailing layout.
    if has_target == ref_has {
        checks.push(CheckResult::new(
            "total length match",
            payload.len() == r.len(),
            format!("ours={} ref={}", payload.len(), r.len()),
        ));
    }
}

fn torpedo_fire_checks(checks: &mut Vec<CheckResult>, payload: &[u8], reference: Option<&[u8]>) {
    if payload.len() < FIRE_HEADER_LEN {
        return;
    }
    let flags = payload[TORPEDO_FLAGS_OFFSET];
    let mode = TorpedoMode::from_flags(flags);
    let trailing = payload.len() - FIRE_HEADER_LEN;

    if let Some(r) = reference.filter(|r| r.len() >= FIRE_HEADER_LEN) {
        let ref_flags = r[TORPEDO_FLAGS_OFFSET];
        checks.push(CheckResult::pass(
            "flag mode",
            format!(
                "ours=0x{flags:02X} {mode} ref=0x{ref_flags:02X} {}",
                TorpedoMode::from_flags(ref_flags)
            ),
        ));
    }

    let expected = mode.expected();
    let detail = match (mode.has_arc, mode.has_target) {
        (false, true) => format!("flags {mode}: target_id(4)+cv4_impact(5), found {trailing}B"),
        (true, true) => format!("flags {mode}: target data then arc, expects {expected}, found {trailing}B"),
        (true, false) => format!("flags {mode}: {trailing}B arc data"),
        (false, false) => format!("no flags set, expects {expected}, found {trailing}B"),
    };
    checks.push(CheckResult::new("trailing length", expected.accepts(trailing), detail));

    if mode.has_target && trailing >= TORPEDO_TARGET_LEN {
        if let Some(id) = read_object_id(payload, FIRE_HEADER_LEN) {
            checks.push(CheckResult::pass(
                format!("target_id @ offset {FIRE_HEADER_LEN}"),
                format!("ours={id} (4B LE i32)"),
            ));
        }
    }
}

fn explosion_checks(checks: &mut Vec<CheckResult>, payload: &[u8], reference: Option<&[u8]>) {
    const LAYOUT: &str = "[op:1][id:4][cv4:5][cf16:2][cf16:2] = 14 bytes";
    if let Some(r) = reference {
        let fits = payload.len() == Explosion::LEN && r.len() == Explosion::LEN;
        let detail = if fits {
            LAYOUT.to_string()
        } else {
            format!("{LAYOUT}, ours={} ref={}", payload.len(), r.len())
        };
        checks.push(CheckResult::new("layout match", fits, detail));
    }
    if let Ok(e) = Explosion::decode(payload) {
        checks.push(CheckResult::pass(
            "decoded values",
            format!(
                "obj=0x{:08X} impact={} dmg={:.1} radius={:.1}",
                e.object_id as u32, e.impact, e.damage, e.radius
            ),
        ));
    }
}

fn state_update_checks(checks: &mut Vec<CheckResult>, payload: &[u8]) {
    let Some(&raw) = payload.get(9) else { return };
    let dirty = DirtyFlags(raw);
    let field_bytes = payload.len() - 10;
    let needed = dirty.min_field_bytes();
    let variable = if dirty.has_variable_fields() {
        " + variable"
    } else {
        ""
    };

    checks.push(CheckResult::new(
        "field_data covers dirty fields",
        field_bytes >= needed,
        format!("{field_bytes}B of field data after dirty_flags, fixed fields need {needed}B{variable}"),
    ));
    checks.push(CheckResult::pass("dirty_flags decode", dirty.to_string()));
}
