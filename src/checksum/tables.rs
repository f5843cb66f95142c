//! Lane substitution tables for the name hash.
//!
//! Each table is a fixed permutation of the byte values `0x00..=0xFF`; lane `i`
//! of the name hash indexes `LANE_TABLES[i]`.

pub(crate) const LANE_0: [u8; 256] = [
    0x1D, 0x50, 0x7E, 0x03, 0x94, 0xCE, 0x97, 0x7F, 0x2A, 0x6B, 0xF1, 0x01, 0x27, 0x6D, 0x8B, 0x13,
    0x9A, 0xFE, 0x90, 0x33, 0x81, 0xD1, 0x1E, 0x48, 0xDD, 0xC3, 0x9B, 0x85, 0x8E, 0x9D, 0x37, 0x18,
    0x36, 0x42, 0x07, 0x78, 0xB5, 0xD6, 0x82, 0x74, 0xD9, 0xAB, 0x10, 0x8A, 0xE2, 0x21, 0x61, 0xC0,
    0x58, 0x72, 0xF7, 0x88, 0x57, 0xED, 0x32, 0x16, 0x5A, 0xF9, 0x79, 0xA1, 0xBA, 0xFC, 0xAC, 0x30,
    0xBC, 0xB4, 0x76, 0x26, 0xBF, 0xCA, 0x6A, 0xA4, 0x2C, 0xF3, 0x38, 0x25, 0xB8, 0xB0, 0x66, 0x5D,
    0x1B, 0x40, 0x96, 0xC1, 0xBE, 0x15, 0x9C, 0x39, 0xEC, 0xB6, 0x1A, 0xA5, 0xA0, 0x4A, 0x54, 0xCC,
    0x5C, 0xDC, 0x5F, 0xB7, 0xA7, 0x22, 0xD5, 0x4C, 0xDF, 0x6E, 0x9E, 0xDA, 0x0B, 0x06, 0x4B, 0x44,
    0xAF, 0x2B, 0x75, 0x86, 0x64, 0xA8, 0x53, 0x65, 0x83, 0xD7, 0xAA, 0x92, 0x95, 0x47, 0xFF, 0x08,
    0xCD, 0xB1, 0xD4, 0x35, 0x8F, 0x3D, 0x0F, 0x00, 0xC5, 0x19, 0x43, 0xC6, 0xC2, 0x84, 0x04, 0x24,
    0xAD, 0x71, 0xEB, 0x69, 0xE8, 0x7A, 0xE1, 0x0D, 0x60, 0x4D, 0x4F, 0x31, 0xCB, 0xC9, 0xC8, 0x8C,
    0x5E, 0xFD, 0x17, 0xCF, 0x09, 0x52, 0xE3, 0x3B, 0x29, 0x0A, 0x73, 0x56, 0x68, 0xF2, 0xD0, 0x3E,
    0x0C, 0x91, 0xE4, 0x49, 0x14, 0x9F, 0x67, 0x63, 0xA6, 0xE6, 0xBB, 0x3C, 0xD2, 0x89, 0xFA, 0xEA,
    0xAE, 0x77, 0x20, 0x6F, 0x8D, 0x05, 0x12, 0x2D, 0x5B, 0x93, 0x99, 0xA3, 0xE5, 0xEE, 0xBD, 0xC4,
    0xF6, 0x59, 0x23, 0x7D, 0xD8, 0x4E, 0xE0, 0xD3, 0xA9, 0x6C, 0xB2, 0x1C, 0x55, 0x2E, 0x11, 0x46,
    0x3F, 0x70, 0xF5, 0x98, 0xEF, 0xE9, 0x0E, 0x62, 0xF4, 0xF0, 0x80, 0x1F, 0x02, 0x34, 0x7B, 0xE7,
    0xDE, 0xDB, 0x45, 0x51, 0xB9, 0x2F, 0xC7, 0xF8, 0x7C, 0x41, 0x28, 0x3A, 0xA2, 0x87, 0xB3, 0xFB,
];

pub(crate) const LANE_1: [u8; 256] = [
    0x9F, 0x8F, 0xDF, 0xB9, 0xD9, 0x1D, 0x45, 0x44, 0xE1, 0x76, 0xB2, 0xDC, 0x77, 0xE7, 0x0F, 0xC9,
    0x72, 0xC3, 0x2A, 0xB4, 0x06, 0x13, 0x3F, 0x7E, 0x8A, 0x7B, 0xE0, 0xC8, 0x31, 0xDB, 0x64, 0x0D,
    0x3C, 0x80, 0x2E, 0x5C, 0xF5, 0xCA, 0x97, 0x5F, 0x79, 0x49, 0xA6, 0xF0, 0xBD, 0x61, 0x08, 0x75,
    0x4E, 0x99, 0x0E, 0x2C, 0xA5, 0x5D, 0x40, 0x55, 0xF4, 0xAE, 0x90, 0x05, 0x0A, 0x33, 0xA7, 0x5E,
    0x57, 0xE6, 0x9B, 0xB5, 0x6C, 0x6A, 0x54, 0x8B, 0xAF, 0x69, 0xCE, 0x7A, 0xCF, 0xE3, 0x9C, 0x7F,
    0x59, 0x9A, 0x88, 0xC4, 0x98, 0xA8, 0x21, 0x37, 0xFA, 0x03, 0x5A, 0x82, 0x26, 0xAB, 0x93, 0xB7,
    0x1F, 0x41, 0xFF, 0x78, 0xEB, 0xD0, 0xA3, 0xBC, 0xDD, 0x73, 0xF8, 0xD3, 0xA0, 0xAD, 0xEE, 0x94,
    0x0C, 0x20, 0xC2, 0x6D, 0x0B, 0xB3, 0x02, 0xC5, 0x34, 0x56, 0xF3, 0x6F, 0x81, 0xE4, 0xBA, 0x3B,
    0xF2, 0x12, 0xCB, 0x58, 0xD6, 0x1C, 0xED, 0x7D, 0xBB, 0x67, 0x8D, 0x2B, 0x1A, 0x04, 0xAC, 0xFE,
    0x25, 0x51, 0x23, 0x46, 0x60, 0x27, 0xA9, 0x36, 0xA2, 0x63, 0x18, 0x39, 0xD2, 0xB1, 0x7C, 0x00,
    0xC1, 0x71, 0x8E, 0x62, 0x5B, 0xDE, 0xB6, 0xB8, 0xF1, 0x9E, 0x10, 0x84, 0x11, 0xF9, 0x17, 0xB0,
    0xAA, 0xC7, 0x15, 0xD7, 0x8C, 0x3E, 0x38, 0x29, 0x24, 0x09, 0x70, 0x52, 0x65, 0x42, 0xD4, 0x48,
    0x92, 0x1E, 0xD1, 0xE5, 0x4D, 0x4C, 0x4B, 0xD5, 0x1B, 0x74, 0x3A, 0xBE, 0x89, 0x95, 0x16, 0x01,
    0x96, 0x9D, 0xEF, 0x28, 0x32, 0x50, 0x30, 0xF6, 0x47, 0x2F, 0xE9, 0x4F, 0x35, 0xC0, 0x22, 0xEC,
    0x43, 0x53, 0x14, 0x4A, 0xA4, 0xE2, 0xEA, 0x83, 0x6E, 0x07, 0x2D, 0x87, 0x68, 0xDA, 0x86, 0xF7,
    0xFC, 0xE8, 0x66, 0xCC, 0x91, 0x85, 0xCD, 0x19, 0x6B, 0xFB, 0xC6, 0xA1, 0xBF, 0xD8, 0x3D, 0xFD,
];

pub(crate) const LANE_2: [u8; 256] = [
    0x35, 0x85, 0x49, 0xE2, 0xA7, 0x42, 0xDF, 0x0B, 0x2D, 0x23, 0xDD, 0xDE, 0x1F, 0x17, 0xBB, 0xCF,
    0x4E, 0xA3, 0x19, 0x04, 0x71, 0x12, 0xB5, 0x50, 0x43, 0x64, 0xA0, 0x15, 0xDB, 0x22, 0xB0, 0x83,
    0x39, 0xEA, 0xAF, 0xC3, 0xD0, 0xCE, 0x77, 0x14, 0xAD, 0x56, 0x80, 0x5F, 0x6E, 0xD2, 0xD9, 0xC0,
    0xE6, 0xF6, 0x70, 0xF9, 0x05, 0x5A, 0x33, 0xC5, 0x8C, 0x73, 0xCB, 0xFA, 0x81, 0x3E, 0xD8, 0x9E,
    0x26, 0xD6, 0x0C, 0xBA, 0xAA, 0xCD, 0x7E, 0x9D, 0xFF, 0x1D, 0x06, 0xC4, 0xED, 0xF2, 0xF4, 0x5B,
    0x94, 0x9B, 0xA1, 0x5E, 0xB8, 0x37, 0xC1, 0xF1, 0x57, 0x7B, 0xD7, 0xFB, 0x25, 0xCC, 0x91, 0xF0,
    0x62, 0x7F, 0xFC, 0x1A, 0x96, 0x72, 0x2F, 0xDA, 0x38, 0xA2, 0x3A, 0xBF, 0xB4, 0xB1, 0xE8, 0xBD,
    0x0F, 0xF7, 0xAE, 0xA6, 0x88, 0x74, 0x2C, 0x7D, 0x01, 0xEC, 0x07, 0x24, 0x40, 0x34, 0x5D, 0x59,
    0x9C, 0x7A, 0x9A, 0xEE, 0xE7, 0x46, 0x9F, 0x61, 0x63, 0x30, 0xB2, 0x97, 0xEF, 0xAC, 0x76, 0x8E,
    0x75, 0xE4, 0xD3, 0xA9, 0x2A, 0x41, 0x00, 0xA5, 0xBC, 0x66, 0x51, 0xCA, 0x1B, 0xB7, 0x7C, 0x0E,
    0x18, 0x6B, 0xC7, 0x78, 0x84, 0x6A, 0x6C, 0x82, 0x60, 0xD5, 0x1C, 0x13, 0x55, 0x52, 0xB9, 0x53,
    0x32, 0x1E, 0xB6, 0x28, 0x4B, 0x8F, 0x11, 0x8D, 0x8B, 0xFD, 0x10, 0x67, 0x3F, 0xD1, 0x36, 0x45,
    0x86, 0xC9, 0x4A, 0x54, 0x4F, 0xF8, 0x79, 0x29, 0x69, 0x08, 0xE9, 0x89, 0x20, 0xAB, 0x6D, 0xE3,
    0xC6, 0x98, 0x99, 0xE5, 0x93, 0x48, 0x09, 0xE1, 0xF3, 0x47, 0x4C, 0xFE, 0x8A, 0x95, 0x3C, 0xEB,
    0x2B, 0x03, 0xF5, 0xA8, 0x58, 0x3D, 0xC2, 0x31, 0x65, 0xDC, 0x27, 0xBE, 0x21, 0x68, 0xE0, 0xB3,
    0xC8, 0xA4, 0x02, 0x2E, 0xD4, 0x3B, 0x6F, 0x5C, 0x87, 0x0A, 0x92, 0x0D, 0x4D, 0x16, 0x44, 0x90,
];

pub(crate) const LANE_3: [u8; 256] = [
    0x5F, 0xD5, 0xB8, 0xF3, 0x68, 0x63, 0xB3, 0xE6, 0xCE, 0x33, 0x02, 0x6A, 0x99, 0xD0, 0x12, 0xA7,
    0x2F, 0x0E, 0xAD, 0xF7, 0xA2, 0x0C, 0x60, 0xAB, 0x4E, 0x75, 0xD7, 0x6F, 0x26, 0xD8, 0x1A, 0xB5,
    0x30, 0xA6, 0xEB, 0x11, 0x2E, 0x61, 0x9F, 0x7A, 0xA3, 0x8E, 0xA0, 0xDF, 0x43, 0xB7, 0x8D, 0xCA,
    0x4A, 0x5A, 0x98, 0xF1, 0x66, 0x38, 0x1C, 0xD1, 0x5D, 0xF0, 0xCF, 0xB1, 0x74, 0xCD, 0x9D, 0xB9,
    0x3E, 0x8C, 0xE7, 0x31, 0xEC, 0x7F, 0x0F, 0x2C, 0x7C, 0x71, 0x6D, 0x8B, 0xFE, 0xC3, 0x23, 0xC0,
    0xB4, 0xC6, 0x7D, 0xC9, 0xBD, 0x3D, 0x04, 0xF2, 0x5E, 0x03, 0xE8, 0xD2, 0xDD, 0x53, 0xFB, 0x64,
    0xDC, 0xD4, 0x90, 0xDA, 0x08, 0x51, 0x78, 0xBC, 0xE4, 0xC1, 0xA1, 0x29, 0x36, 0xCC, 0x1B, 0x87,
    0x95, 0x8F, 0xE9, 0x97, 0xD9, 0x80, 0x6E, 0xF4, 0x94, 0xDB, 0x10, 0xE2, 0xAE, 0xBB, 0x93, 0xD3,
    0x57, 0x5B, 0x2D, 0x0B, 0x01, 0x7B, 0xF6, 0x40, 0x1E, 0x09, 0x9B, 0x67, 0x83, 0x96, 0xB2, 0xFC,
    0x46, 0x89, 0xB6, 0x9C, 0xC4, 0x69, 0x70, 0x54, 0x24, 0x05, 0x28, 0xDE, 0x17, 0xEE, 0xA8, 0xE5,
    0x77, 0x48, 0x16, 0x0D, 0x06, 0x18, 0x42, 0x5C, 0x1D, 0xFD, 0xC5, 0x50, 0xAA, 0x4D, 0xEA, 0x21,
    0x59, 0x9E, 0xF8, 0x73, 0x14, 0x82, 0x32, 0x3C, 0xEF, 0xE3, 0x15, 0x8A, 0x07, 0x41, 0x56, 0xC8,
    0x79, 0x22, 0x45, 0x92, 0xA5, 0x1F, 0xC7, 0x2A, 0x85, 0x19, 0xBE, 0xE0, 0x7E, 0x25, 0xBF, 0x9A,
    0x0A, 0x47, 0x84, 0xED, 0xB0, 0x81, 0x72, 0x6B, 0x52, 0xD6, 0xFF, 0x44, 0x3F, 0xA9, 0xF9, 0xC2,
    0x37, 0x20, 0xAF, 0x3A, 0xCB, 0x62, 0x88, 0x86, 0x4B, 0x76, 0x2B, 0x91, 0x58, 0xA4, 0xFA, 0xF5,
    0x55, 0x49, 0x4F, 0xBA, 0xE1, 0x39, 0x4C, 0x13, 0x65, 0x3B, 0x34, 0x6C, 0x00, 0x35, 0xAC, 0x27,
];

pub(crate) const LANE_TABLES: [&[u8; 256]; 4] = [&LANE_0, &LANE_1, &LANE_2, &LANE_3];
