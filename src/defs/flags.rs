use bitflags::bitflags;

bitflags! {
    /// Which overrides a persisted vertex-data record carries.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct VertexDataFlags: u32 {
        const Z_FLOOR_ENABLED   = 0x0000_0001;
        const Z_CEILING_ENABLED = 0x0000_0002;
    }
}

bitflags! {
    /// Map compatibility switches honoured by the slope pass.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CompatFlags: u32 {
        // Angle slopes multiply 16.16 values in 32 bits, overflow included.
        const SET_SLOPE_OVERFLOW = 0x0000_0001;
    }
}
