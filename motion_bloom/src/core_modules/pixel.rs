// THEORY:
// The `Pixel` module is the smallest unit the motion detector looks at. A pixel
// is a "dumb" RGBA container read straight out of an interleaved frame buffer.
// The only comparison the bloom pipeline needs is the average absolute change
// of the three color channels between two frames; alpha is carried but never
// compared, since camera frames are always fully opaque.
//
// The average uses integer division, so a summed change of 92 across three
// channels reads as 30, not 30.67. Thresholds are tuned against that.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type ChannelDelta = u16;

    pub const CHANNELS: usize = 4;

    /// A single RGBA pixel copied out of a frame buffer.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Pixel {
        pub red: Channel,
        pub green: Channel,
        pub blue: Channel,
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Reads the pixel starting at `byte_index`, or `None` when the buffer
        /// is too short to hold all four channels there.
        #[inline]
        pub fn read(buffer: &[Byte], byte_index: usize) -> Option<Self> {
            buffer
                .get(byte_index..byte_index + CHANNELS)
                .map(|bytes| Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3]))
        }

        /// Sum of the absolute per-channel differences over R, G and B.
        #[inline]
        pub fn rgb_difference(&self, other: &Pixel) -> ChannelDelta {
            self.red.abs_diff(other.red) as ChannelDelta
                + self.green.abs_diff(other.green) as ChannelDelta
                + self.blue.abs_diff(other.blue) as ChannelDelta
        }

        /// Mean absolute RGB difference, truncated toward zero.
        #[inline]
        pub fn average_rgb_difference(&self, other: &Pixel) -> ChannelDelta {
            self.rgb_difference(other) / 3
        }
    }

    impl From<[Byte; CHANNELS]> for Pixel {
        fn from(bytes: [Byte; CHANNELS]) -> Self {
            Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3])
        }
    }

    impl From<Pixel> for [Byte; CHANNELS] {
        fn from(pixel: Pixel) -> Self {
            [pixel.red, pixel.green, pixel.blue, pixel.alpha]
        }
    }
}
