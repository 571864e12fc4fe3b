//! Processor identity through the `CPUID` instruction, for x86 platforms
//! without a better source.

#[cfg(target_arch = "x86")]
use std::arch::x86::{CpuidResult, __cpuid};
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{CpuidResult, __cpuid};

use super::IdentitySource;
use crate::collection::error::{CollectionError, CollectionResult};

const VENDOR_LEAF: u32 = 0;
const SIGNATURE_LEAF: u32 = 1;
const EXTENDED_MAX_LEAF: u32 = 0x8000_0000;
const EXTENDED_FEATURE_LEAF: u32 = 0x8000_0001;
const BRAND_LEAVES: [u32; 3] = [0x8000_0002, 0x8000_0003, 0x8000_0004];

/// Long mode, in `edx` of leaf `0x80000001`.
const LONG_MODE_BIT: u32 = 1 << 29;

#[allow(unused_unsafe)]
fn cpuid(leaf: u32) -> CpuidResult {
    // SAFETY: Every processor this builds for supports CPUID.
    unsafe { __cpuid(leaf) }
}

/// Family, model and stepping decoded from the signature in `eax` of leaf 1,
/// folding in the extended family and model the way Intel and AMD document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Signature {
    family: u32,
    model: u32,
    stepping: u32,
}

impl Signature {
    fn decode(eax: u32) -> Self {
        let stepping = eax & 0xF;
        let base_model = (eax >> 4) & 0xF;
        let base_family = (eax >> 8) & 0xF;
        let extended_model = (eax >> 16) & 0xF;
        let extended_family = (eax >> 20) & 0xFF;

        let family = if base_family == 0xF {
            base_family + extended_family
        } else {
            base_family
        };
        let model = if base_family == 0x6 || base_family == 0xF {
            (extended_model << 4) + base_model
        } else {
            base_model
        };

        Signature {
            family,
            model,
            stepping,
        }
    }
}

fn registers_to_string(registers: &[u32]) -> String {
    let bytes: Vec<u8> = registers.iter().flat_map(|reg| reg.to_le_bytes()).collect();

    String::from_utf8_lossy(&bytes)
        .trim_matches(char::from(0))
        .trim()
        .to_string()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CpuidSource;

impl CpuidSource {
    fn signature(&self) -> Signature {
        Signature::decode(cpuid(SIGNATURE_LEAF).eax)
    }

    fn max_extended_leaf(&self) -> u32 {
        cpuid(EXTENDED_MAX_LEAF).eax
    }
}

impl IdentitySource for CpuidSource {
    fn query_vendor_id(&self) -> CollectionResult<String> {
        let result = cpuid(VENDOR_LEAF);

        Ok(registers_to_string(&[result.ebx, result.edx, result.ecx]))
    }

    fn query_brand_string(&self) -> CollectionResult<String> {
        if self.max_extended_leaf() < BRAND_LEAVES[2] {
            return Err(CollectionError::identity(
                "this processor does not report a brand string",
            ));
        }

        let registers: Vec<u32> = BRAND_LEAVES
            .iter()
            .map(|&leaf| cpuid(leaf))
            .flat_map(|result| [result.eax, result.ebx, result.ecx, result.edx])
            .collect();

        Ok(registers_to_string(&registers))
    }

    fn query_family(&self) -> CollectionResult<String> {
        Ok(self.signature().family.to_string())
    }

    fn query_model(&self) -> CollectionResult<String> {
        Ok(self.signature().model.to_string())
    }

    fn query_stepping(&self) -> CollectionResult<String> {
        Ok(self.signature().stepping.to_string())
    }

    fn query_64bit_capable(&self) -> CollectionResult<bool> {
        if self.max_extended_leaf() < EXTENDED_FEATURE_LEAF {
            return Ok(false);
        }

        Ok(cpuid(EXTENDED_FEATURE_LEAF).edx & LONG_MODE_BIT != 0)
    }
}
