use std::io;

use erlab_bytes_util::BitReader;
use erlab_expgolomb::BitReaderExpGolombExt;

/// The conformance cropping window, in chroma sample units.
///
/// `width = pic_width_in_luma_samples - sub_width_c * (left + right)`
///
/// `height = pic_height_in_luma_samples - sub_height_c * (top + bottom)`
///
/// ISO/IEC-23008-2-2020 - 7.4.3.2.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConformanceWindow {
    /// `conf_win_left_offset`
    pub conf_win_left_offset: u64,
    /// `conf_win_right_offset`
    pub conf_win_right_offset: u64,
    /// `conf_win_top_offset`
    pub conf_win_top_offset: u64,
    /// `conf_win_bottom_offset`
    pub conf_win_bottom_offset: u64,
}

impl ConformanceWindow {
    /// Parses the fields defined when the `conformance_window_flag == 1` from a bitstream.
    pub fn parse<R: io::Read>(reader: &mut BitReader<R>) -> io::Result<Self> {
        let conf_win_left_offset = reader.read_exp_golomb()?;
        let conf_win_right_offset = reader.read_exp_golomb()?;
        let conf_win_top_offset = reader.read_exp_golomb()?;
        let conf_win_bottom_offset = reader.read_exp_golomb()?;

        Ok(ConformanceWindow {
            conf_win_left_offset,
            conf_win_right_offset,
            conf_win_top_offset,
            conf_win_bottom_offset,
        })
    }

    /// Applies the window to a coded picture size.
    ///
    /// Fails if the window is larger than the picture.
    pub fn crop(&self, width: u64, height: u64, sub_width_c: u64, sub_height_c: u64) -> io::Result<(u64, u64)> {
        let cropped_width = self
            .conf_win_left_offset
            .checked_add(self.conf_win_right_offset)
            .and_then(|offset| offset.checked_mul(sub_width_c))
            .and_then(|offset| width.checked_sub(offset))
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "conformance window exceeds the picture width"))?;

        let cropped_height = self
            .conf_win_top_offset
            .checked_add(self.conf_win_bottom_offset)
            .and_then(|offset| offset.checked_mul(sub_height_c))
            .and_then(|offset| height.checked_sub(offset))
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "conformance window exceeds the picture height"))?;

        Ok((cropped_width, cropped_height))
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use super::ConformanceWindow;

    #[test]
    fn test_crop() {
        let window = ConformanceWindow {
            conf_win_left_offset: 0,
            conf_win_right_offset: 0,
            conf_win_top_offset: 0,
            conf_win_bottom_offset: 4,
        };

        assert_eq!(window.crop(1920, 1088, 2, 2).unwrap(), (1920, 1080));
        assert_eq!(window.crop(1920, 1088, 1, 1).unwrap(), (1920, 1084));
    }

    #[test]
    fn test_crop_larger_than_picture() {
        let window = ConformanceWindow {
            conf_win_left_offset: 100,
            conf_win_right_offset: 0,
            conf_win_top_offset: 0,
            conf_win_bottom_offset: 0,
        };

        assert_eq!(window.crop(64, 64, 2, 2).unwrap_err().kind(), io::ErrorKind::InvalidData);
    }
}
