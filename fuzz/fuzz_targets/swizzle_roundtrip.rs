#![no_main]

// Swizzling then unswizzling any swizzlable buffer must restore it byte for byte.

use gu_texture::swizzle::{swizzle, unswizzle};
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct SwizzleInput {
    pub blocks_wide: u8,
    pub stripes: u8,
    pub seed: u8,
}

fuzz_target!(|input: SwizzleInput| {
    let pitch = (input.blocks_wide as usize % 32 + 1) * 16;
    let rows = (input.stripes as usize % 16 + 1) * 8;
    let linear: Vec<u8> = (0..pitch * rows)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(input.seed))
        .collect();

    let mut swizzled = vec![0u8; linear.len()];
    let mut restored = vec![0u8; linear.len()];
    swizzle(&linear, &mut swizzled, pitch, rows).unwrap();
    unswizzle(&swizzled, &mut restored, pitch, rows).unwrap();

    assert_eq!(
        linear, restored,
        "Swizzle round trip changed the data (pitch {pitch}, rows {rows})"
    );
});
