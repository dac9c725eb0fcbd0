//! Decodes the entropy-coded segment with the generated tables and checks
//! that every merged source row comes back unchanged.

use std::collections::HashMap;

use cfa_lossless_rs::image_pipeline::jpeg::CodeTable;
use cfa_lossless_rs::image_pipeline::lossless::sink::residual_from_payload;
use cfa_lossless_rs::image_pipeline::{EncodeSummary, Geometry, LosslessEncoder};

struct BitReader {
    bytes: Vec<u8>,
    pos: usize,
}

impl BitReader {
    fn new(segment: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(segment.len());
        let mut i = 0;
        while i < segment.len() {
            bytes.push(segment[i]);
            if segment[i] == 0xFF {
                assert_eq!(segment.get(i + 1), Some(&0x00), "unstuffed 0xFF at {}", i);
                i += 1;
            }
            i += 1;
        }
        Self { bytes, pos: 0 }
    }

    fn bit(&mut self) -> u32 {
        let byte = self.bytes[self.pos / 8];
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        bit as u32
    }

    fn bits(&mut self, count: u32) -> u32 {
        (0..count).fold(0, |acc, _| (acc << 1) | self.bit())
    }
}

fn decode_table(table: &CodeTable) -> HashMap<(u8, u16), u8> {
    table
        .codes()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.len > 0)
        .map(|(category, c)| ((c.len, c.code), category as u8))
        .collect()
}

fn read_category(reader: &mut BitReader, lookup: &HashMap<(u8, u16), u8>) -> u8 {
    let mut code = 0u16;
    for len in 1..=16u8 {
        code = (code << 1) | reader.bit() as u16;
        if let Some(&category) = lookup.get(&(len, code)) {
            return category;
        }
    }
    panic!("no codeword matched");
}

/// Reconstructs every merged row from the encoded residuals.
fn decode(out: &[u8], summary: &EncodeSummary) -> Vec<Vec<u16>> {
    let g = summary.geometry;
    let segment = &out[summary.header_bytes as usize..out.len() - 2];
    let mut reader = BitReader::new(segment);
    let lookups: Vec<_> = summary.tables.iter().map(decode_table).collect();
    let table1 = lookups.len() - 1;

    let mut rows: Vec<Vec<u16>> = Vec::new();
    for pair in 0..g.merged_rows() {
        let (mut pred_even, mut pred_odd) = match rows.last() {
            Some(prev) => (prev[0] as i32, prev[1] as i32),
            None => (g.mid_gray() as i32, g.mid_gray() as i32),
        };
        let mut row = Vec::with_capacity(g.merged_width());
        for _ in 0..g.merged_width() / 2 {
            for (route, pred) in [(0, &mut pred_even), (table1, &mut pred_odd)] {
                let category = read_category(&mut reader, &lookups[route]);
                let residual = match category {
                    16 => 32768,
                    c => residual_from_payload(c, reader.bits(c as u32)),
                };
                let sample = *pred + residual;
                row.push(sample as u16);
                *pred = sample;
            }
        }
        assert_eq!(row.len(), g.merged_width(), "pair {}", pair);
        rows.push(row);
    }
    rows
}

fn padded_row(samples: &[u16], g: &Geometry, row: usize) -> Vec<u16> {
    let start = row * g.row_width;
    let mut out = samples[start..start + g.enc_cols].to_vec();
    for col in g.enc_cols..g.out_cols {
        out.push(out[col - 2]);
    }
    out
}

fn expected_rows(samples: &[u16], g: &Geometry) -> Vec<Vec<u16>> {
    (0..g.enc_rows)
        .step_by(2)
        .map(|row| {
            let second = if row + 1 < g.enc_rows { row + 1 } else { row };
            let mut merged = padded_row(samples, g, row);
            merged.extend(padded_row(samples, g, second));
            merged
        })
        .collect()
}

fn mosaic(len: usize, bits: u32) -> Vec<u16> {
    let mask = (1u32 << bits) - 1;
    let mut state = 0x1234_5678u32;
    (0..len)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            // smooth base plus a little noise, like a real sensor
            ((i as u32 * 5 + (state & 0x3F)) & mask) as u16
        })
        .collect()
}

fn assert_round_trip(samples: &[u16], g: Geometry, multi_table: bool) {
    let mut out = Vec::new();
    let summary = LosslessEncoder::new(multi_table).encode(samples, &g, &mut out).unwrap();
    assert_eq!(summary.residual_count(), g.residual_count() as u64);

    let decoded = decode(&out, &summary);
    let expected = expected_rows(samples, &g);
    for (pair, row) in expected.iter().enumerate() {
        assert_eq!(&decoded[pair], row, "merged row {}", pair);
    }
    // zero filler residuals repeat the first sample pair of the row above
    for pair in expected.len()..decoded.len() {
        let above = &decoded[pair - 1];
        let fill = [above[0], above[1]];
        assert!(decoded[pair].chunks_exact(2).all(|p| p == fill), "filler row {}", pair);
    }
}

#[test]
fn test_twelve_bit_mosaic_round_trips() {
    let g = Geometry::for_image(16, 12, 12);
    assert_round_trip(&mosaic(16 * 12, 12), g, true);
}

#[test]
fn test_single_table_round_trips() {
    let g = Geometry::for_image(10, 8, 14);
    assert_round_trip(&mosaic(10 * 8, 14), g, false);
}

#[test]
fn test_padded_geometry_round_trips() {
    let g = Geometry {
        enc_rows: 7,
        enc_cols: 6,
        out_rows: 12,
        out_cols: 10,
        row_width: 8,
        channels: 2,
        bit_depth: 10,
    };
    let samples = mosaic(7 * 8, 10);
    assert_round_trip(&samples, g, true);
}

#[test]
fn test_four_by_four_round_trips() {
    let samples: Vec<u16> = vec![
        10, 20, 30, 40, //
        11, 21, 31, 41, //
        12, 22, 32, 42, //
        13, 23, 33, 43,
    ];
    let g = Geometry {
        enc_rows: 4,
        enc_cols: 4,
        out_rows: 4,
        out_cols: 4,
        row_width: 4,
        channels: 2,
        bit_depth: 8,
    };
    assert_round_trip(&samples, g, false);
}
