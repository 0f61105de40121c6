use std::io;

use erlab_bytes_util::BitReader;

/// general/sub_layer profile_space, tier_flag, profile_idc, compatibility
/// flags, source and constraint flags.
const PROFILE_BITS: u64 = 88;
/// general/sub_layer level_idc
const LEVEL_BITS: u64 = 8;

/// ISO/IEC-23008-2-2020 - 7.3.3
pub(crate) struct ProfileTierLevel;

impl ProfileTierLevel {
    /// Skips a `profile_tier_level()` structure, honouring the per sub-layer
    /// profile and level present flags.
    pub(crate) fn skip<R: io::Read>(
        bit_reader: &mut BitReader<R>,
        profile_present_flag: bool,
        max_num_sub_layers_minus_1: u8,
    ) -> io::Result<()> {
        if profile_present_flag {
            bit_reader.skip_bits(PROFILE_BITS)?;
        }

        bit_reader.skip_bits(LEVEL_BITS)?; // general_level_idc

        let mut sub_layers = Vec::with_capacity(max_num_sub_layers_minus_1 as usize);
        for _ in 0..max_num_sub_layers_minus_1 {
            let sub_layer_profile_present_flag = bit_reader.read_bit()?;
            let sub_layer_level_present_flag = bit_reader.read_bit()?;
            sub_layers.push((sub_layer_profile_present_flag, sub_layer_level_present_flag));
        }

        // reserved_zero_2bits
        if max_num_sub_layers_minus_1 > 0 && max_num_sub_layers_minus_1 < 8 {
            bit_reader.skip_bits(2 * (8 - max_num_sub_layers_minus_1 as u64))?;
        }

        for (profile_present, level_present) in sub_layers {
            if profile_present {
                bit_reader.skip_bits(PROFILE_BITS)?;
            }

            if level_present {
                bit_reader.skip_bits(LEVEL_BITS)?;
            }
        }

        Ok(())
    }
}
