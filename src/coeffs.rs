//! Clock divider settings for every supported MCLK / sample-rate pair.
//!
//! These are measured values, not computed ones. Getting any field wrong
//! gives audible pitch or speed errors, so the table must not be "tidied up".

//
// Public Types
//

/// The divider, multiplier and oversampling settings for one MCLK frequency
/// and one sample rate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoefficientEntry {
    /// Master clock frequency, in Hz
    pub mclk_hz: u32,
    /// Sample rate, in Hz
    pub sample_rate_hz: u32,
    /// MCLK pre-divider (1..=8)
    pub pre_div: u8,
    /// MCLK pre-multiplier selector (0 = x1, 1 = x2, 2 = x4, 3 = x8)
    pub pre_multiplier: u8,
    /// ADC clock divider (1..=16)
    pub adc_div: u8,
    /// DAC clock divider (1..=16)
    pub dac_div: u8,
    /// 0 = single speed, 1 = double speed
    pub fs_mode: u8,
    /// LRCK divider, high bits
    pub lrck_high: u8,
    /// LRCK divider, low byte
    pub lrck_low: u8,
    /// BCLK divider
    pub bclk_div: u8,
    /// ADC oversampling ratio
    pub adc_oversample: u8,
    /// DAC oversampling ratio
    pub dac_oversample: u8,
}

//
// Public Data
//

/// Every supported configuration, in search order.
///
/// Lookups return the first row that matches, so the order matters.
pub static COEFFICIENTS: [CoefficientEntry; 76] = [
    // mclk, rate, pre_div, pre_multi, adc_div, dac_div, fs_mode, lrck_h, lrck_l, bclk_div, adc_osr, dac_osr
    // 8k
    entry(12_288_000, 8_000, 0x06, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(18_432_000, 8_000, 0x03, 0x01, 0x03, 0x03, 0x00, 0x05, 0xff, 0x18, 0x10, 0x10),
    entry(16_384_000, 8_000, 0x08, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(8_192_000, 8_000, 0x04, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(6_144_000, 8_000, 0x03, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(4_096_000, 8_000, 0x02, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(3_072_000, 8_000, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(2_048_000, 8_000, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_536_000, 8_000, 0x03, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_024_000, 8_000, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),

    // 11.025k
    entry(11_289_600, 11_025, 0x04, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(5_644_800, 11_025, 0x02, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(2_822_400, 11_025, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_411_200, 11_025, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),

    // 12k
    entry(12_288_000, 12_000, 0x04, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(6_144_000, 12_000, 0x02, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(3_072_000, 12_000, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_536_000, 12_000, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),

    // 16k
    entry(12_288_000, 16_000, 0x03, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(18_432_000, 16_000, 0x03, 0x01, 0x03, 0x03, 0x00, 0x02, 0xff, 0x0c, 0x10, 0x10),
    entry(16_384_000, 16_000, 0x04, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(8_192_000, 16_000, 0x02, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(6_144_000, 16_000, 0x03, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(4_096_000, 16_000, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(3_072_000, 16_000, 0x03, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(2_048_000, 16_000, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_536_000, 16_000, 0x03, 0x03, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_024_000, 16_000, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),

    // 22.05k
    entry(11_289_600, 22_050, 0x02, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(5_644_800, 22_050, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(2_822_400, 22_050, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_411_200, 22_050, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(705_600, 22_050, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),

    // 24k
    entry(12_288_000, 24_000, 0x02, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(18_432_000, 24_000, 0x03, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(6_144_000, 24_000, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(3_072_000, 24_000, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_536_000, 24_000, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),

    // 32k
    entry(12_288_000, 32_000, 0x03, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(18_432_000, 32_000, 0x03, 0x02, 0x03, 0x03, 0x00, 0x02, 0xff, 0x0c, 0x10, 0x10),
    entry(16_384_000, 32_000, 0x02, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(8_192_000, 32_000, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(6_144_000, 32_000, 0x03, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(4_096_000, 32_000, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(3_072_000, 32_000, 0x03, 0x03, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(2_048_000, 32_000, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_536_000, 32_000, 0x03, 0x03, 0x01, 0x01, 0x01, 0x00, 0x7f, 0x02, 0x10, 0x10),
    entry(1_024_000, 32_000, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),

    // 44.1k
    entry(11_289_600, 44_100, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(5_644_800, 44_100, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(2_822_400, 44_100, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_411_200, 44_100, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),

    // 48k
    entry(12_288_000, 48_000, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(18_432_000, 48_000, 0x03, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(6_144_000, 48_000, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(3_072_000, 48_000, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_536_000, 48_000, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),

    // 64k
    entry(12_288_000, 64_000, 0x03, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(18_432_000, 64_000, 0x03, 0x02, 0x03, 0x03, 0x01, 0x01, 0x7f, 0x06, 0x10, 0x10),
    entry(16_384_000, 64_000, 0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(8_192_000, 64_000, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(6_144_000, 64_000, 0x01, 0x02, 0x03, 0x03, 0x01, 0x01, 0x7f, 0x06, 0x10, 0x10),
    entry(4_096_000, 64_000, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(3_072_000, 64_000, 0x01, 0x03, 0x03, 0x03, 0x01, 0x01, 0x7f, 0x06, 0x10, 0x10),
    entry(2_048_000, 64_000, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_536_000, 64_000, 0x01, 0x03, 0x01, 0x01, 0x01, 0x00, 0xbf, 0x03, 0x18, 0x18),
    entry(1_024_000, 64_000, 0x01, 0x03, 0x01, 0x01, 0x01, 0x00, 0x7f, 0x02, 0x10, 0x10),

    // 88.2k
    entry(11_289_600, 88_200, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(5_644_800, 88_200, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(2_822_400, 88_200, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_411_200, 88_200, 0x01, 0x03, 0x01, 0x01, 0x01, 0x00, 0x7f, 0x02, 0x10, 0x10),

    // 96k
    entry(12_288_000, 96_000, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(18_432_000, 96_000, 0x03, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(6_144_000, 96_000, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(3_072_000, 96_000, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0xff, 0x04, 0x10, 0x10),
    entry(1_536_000, 96_000, 0x01, 0x03, 0x01, 0x01, 0x01, 0x00, 0x7f, 0x02, 0x10, 0x10),
];

//
// Public Functions
//

/// Find the settings for this exact MCLK frequency and sample rate.
///
/// There is no nearest-match fallback: a rate the table doesn't list is not
/// supported.
pub fn lookup(mclk_hz: u32, sample_rate_hz: u32) -> Option<&'static CoefficientEntry> {
    COEFFICIENTS
        .iter()
        .find(|e| e.mclk_hz == mclk_hz && e.sample_rate_hz == sample_rate_hz)
}

/// The MCLK frequency we run at for a given sample rate.
///
/// MCLK is 256 x Fs, except above 64 kHz where it is 128 x Fs to keep the
/// PLL input in range.
pub const fn mclk_for_rate(sample_rate_hz: u32) -> u32 {
    let mclk_hz = sample_rate_hz.saturating_mul(256);
    if sample_rate_hz > 64_000 {
        mclk_hz / 2
    } else {
        mclk_hz
    }
}

//
// Private Functions
//

#[allow(clippy::too_many_arguments)]
const fn entry(
    mclk_hz: u32,
    sample_rate_hz: u32,
    pre_div: u8,
    pre_multiplier: u8,
    adc_div: u8,
    dac_div: u8,
    fs_mode: u8,
    lrck_high: u8,
    lrck_low: u8,
    bclk_div: u8,
    adc_oversample: u8,
    dac_oversample: u8,
) -> CoefficientEntry {
    CoefficientEntry {
        mclk_hz,
        sample_rate_hz,
        pre_div,
        pre_multiplier,
        adc_div,
        dac_div,
        fs_mode,
        lrck_high,
        lrck_low,
        bclk_div,
        adc_oversample,
        dac_oversample,
    }
}


//
// End of file
//
