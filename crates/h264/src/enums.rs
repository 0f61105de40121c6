use nutype_enum::nutype_enum;

nutype_enum! {
    /// NAL unit types, ISO/IEC 14496-10:2022 Table 7-1.
    ///
    /// Only the types this crate looks at are named.
    pub enum NALUnitType(u8) {
        /// Coded slice of a non-IDR picture
        NonIDRSliceLayerWithoutPartitioning = 1,
        /// Coded slice of an IDR picture
        IDRSliceLayerWithoutPartitioning = 5,
        /// Supplemental enhancement information
        SEI = 6,
        /// Sequence parameter set
        SPS = 7,
        /// Picture parameter set
        PPS = 8,
        /// Access unit delimiter
        AccessUnitDelimiter = 9,
        /// Sequence parameter set extension
        SPSExtension = 13,
    }
}
