use num::traits::AsPrimitive;

/// Rebuilds one physical value from a packed word:
/// `(reference + word * 2^binary_scale) / 10^decimal_scale`.
///
/// Scaling is done in double precision before narrowing; NaN and infinities
/// coming out of degenerate scale factors are returned as is.
pub fn reconstruct(reference_value: f32, binary_scale: i32, decimal_scale: i32, word: u32) -> f32 {
    scale(f64::from(reference_value), 2_f64.powi(binary_scale), 10_f64.powi(decimal_scale), f64::from(word))
}

fn scale(reference_value: f64, binary_scale: f64, decimal_scale: f64, word: f64) -> f32 {
    ((reference_value + word * binary_scale) / decimal_scale) as f32
}

pub struct SimpleDecoderIterator<I: Iterator<Item = N>, N: AsPrimitive<f64>> {
    words: I,
    reference_value: f64,
    binary_scale: f64,
    decimal_scale: f64,
}

impl<I: Iterator<Item = N>, N: AsPrimitive<f64>> SimpleDecoderIterator<I, N> {
    pub fn new(words: I, reference_value: f32, binary_scale_factor: i32, decimal_scale_factor: i32) -> Self {
        Self {
            words,
            reference_value: reference_value.into(),
            binary_scale: 2_f64.powi(binary_scale_factor),
            decimal_scale: 10_f64.powi(decimal_scale_factor),
        }
    }
}

impl<I: Iterator<Item = N>, N: AsPrimitive<f64>> Iterator for SimpleDecoderIterator<I, N> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let word = self.words.next()?;
        Some(scale(self.reference_value, self.binary_scale, self.decimal_scale, word.as_()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.words.size_hint()
    }
}
