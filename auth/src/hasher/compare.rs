use subtle::Choice;
use subtle::ConstantTimeEq;

/// Compare two byte strings without leaking where they differ.
///
/// Visits `max(a.len(), b.len())` positions whatever the contents, folding a
/// length-mismatch flag into the per-byte accumulator. Missing positions on
/// the shorter side compare against zero; the length flag already fails them.
pub fn constant_time_equals(a: &[u8], b: &[u8]) -> bool {
    let mut equal: Choice = a.len().ct_eq(&b.len());

    for i in 0..a.len().max(b.len()) {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        equal &= left.ct_eq(&right);
    }

    equal.into()
}
