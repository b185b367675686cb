use super::genome::{Gene, Symbol, ALPHABET, GENE_SIZE};
use crate::error::{PivotgenError, Result};
use serde::{Deserialize, Serialize};

/// Agent hyperparameters as raw gene numerals.
///
/// Field ranges follow from the numeral widths: `pivots` 0..=15,
/// `time_frame` 0..=3, `diff_major` 0..=15, `diff_minor` 0..=255,
/// `batch` 0..=63.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneConfig {
    pub pivots: u32,
    pub time_frame: u32,
    pub diff_major: u32,
    pub diff_minor: u32,
    pub batch: u32,
}

/// (field name, numeral width) in gene order
pub const FIELD_LAYOUT: [(&str, usize); 5] = [
    ("pivots", 2),
    ("timeFrame", 1),
    ("diffMajor", 2),
    ("diffMinor", 4),
    ("batch", 3),
];

impl GeneConfig {
    pub fn fields(&self) -> [u32; 5] {
        [self.pivots, self.time_frame, self.diff_major, self.diff_minor, self.batch]
    }

    fn from_fields(fields: [u32; 5]) -> Self {
        Self {
            pivots: fields[0],
            time_frame: fields[1],
            diff_major: fields[2],
            diff_minor: fields[3],
            batch: fields[4],
        }
    }
}

pub struct GeneCodec;

impl GeneCodec {
    pub fn encode(config: &GeneConfig) -> Result<Gene> {
        let mut symbols = [Symbol::S; GENE_SIZE];
        let mut offset = 0;

        for ((name, width), value) in FIELD_LAYOUT.iter().zip(config.fields()) {
            let limit = (ALPHABET.len() as u32).pow(*width as u32);
            if value >= limit {
                return Err(PivotgenError::InvalidConfig(format!(
                    "{} = {} does not fit in {} base-4 digits (max {})",
                    name,
                    value,
                    width,
                    limit - 1
                )));
            }

            let mut rest = value;
            for slot in symbols[offset..offset + width].iter_mut().rev() {
                *slot = ALPHABET[(rest % ALPHABET.len() as u32) as usize];
                rest /= ALPHABET.len() as u32;
            }
            offset += width;
        }

        Ok(Gene::from_symbols(symbols))
    }

    pub fn decode(gene: &Gene) -> GeneConfig {
        let symbols = gene.symbols();
        let mut fields = [0u32; 5];
        let mut offset = 0;

        for (field, (_, width)) in fields.iter_mut().zip(FIELD_LAYOUT.iter()) {
            *field = symbols[offset..offset + width]
                .iter()
                .fold(0, |acc, s| acc * ALPHABET.len() as u32 + s.index() as u32);
            offset += width;
        }

        GeneConfig::from_fields(fields)
    }

    /// Decode gene text, rejecting wrong lengths and foreign symbols
    pub fn decode_str(text: &str) -> Result<GeneConfig> {
        let gene: Gene = text.parse()?;
        Ok(Self::decode(&gene))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encodings() {
        let first = GeneConfig { pivots: 3, time_frame: 0, diff_major: 0, diff_minor: 1, batch: 15 };
        let second = GeneConfig { pivots: 5, time_frame: 1, diff_major: 0, diff_minor: 5, batch: 1 };

        assert_eq!(GeneCodec::encode(&first).unwrap().to_string(), "SRSSSSSSTSRR");
        assert_eq!(GeneCodec::encode(&second).unwrap().to_string(), "TTTSSSSTTSST");
    }

    #[test]
    fn test_extremes() {
        let max = GeneConfig { pivots: 15, time_frame: 3, diff_major: 15, diff_minor: 255, batch: 63 };
        assert_eq!(GeneCodec::encode(&max).unwrap().to_string(), "RRRRRRRRRRRR");
        assert_eq!(GeneCodec::encode(&GeneConfig::default()).unwrap().to_string(), "SSSSSSSSSSSS");
        assert_eq!(GeneCodec::decode_str("RRRRRRRRRRRR").unwrap(), max);
    }

    #[test]
    fn test_out_of_range_field_rejected() {
        let config = GeneConfig { batch: 64, ..GeneConfig::default() };
        assert!(matches!(
            GeneCodec::encode(&config),
            Err(PivotgenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_decode_str_rejects_malformed() {
        assert!(matches!(GeneCodec::decode_str("SRS"), Err(PivotgenError::InvalidGene(_))));
        assert!(matches!(
            GeneCodec::decode_str("SRSSSSSSTSRQ"),
            Err(PivotgenError::InvalidGene(_))
        ));
    }
}
