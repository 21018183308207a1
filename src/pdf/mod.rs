//! # PDF Serializer
//!
//! Takes the painted pages of a [`RenderedDocument`] and writes a PDF 1.7
//! file.
//!
//! We write the raw bytes ourselves. The subset of the format a report
//! needs (text, rectangles, rules, one logo image) is small, and owning the
//! writer keeps the output byte-for-byte reproducible: objects are numbered
//! in a fixed order, resource dictionaries are sorted, and the only date in
//! the file is the generation date the caller passes in.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! ## Font Embedding
//!
//! Helvetica and Helvetica-Bold are plain Type1 references in
//! WinAnsiEncoding. A custom TrueType font is embedded whole as CIDFontType2
//! with Identity-H encoding, producing 5 PDF objects: FontFile2,
//! FontDescriptor, CIDFont, ToUnicode CMap, and the root Type0 dictionary.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;
use std::sync::Arc;

use chrono::NaiveDate;
use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::Result;
use crate::font::{CustomFont, FontData, FontHandle, FontWeight};
use crate::image_loader::{ImagePixelData, JpegColorSpace, LoadedImage};
use crate::layout::{DrawCommand, Page, RenderedDocument};
use crate::style::Color;

const PRODUCER: &str = concat!("compliance-reports ", env!("CARGO_PKG_VERSION"));

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Written as /CreationDate at midnight UTC.
    pub creation_date: Option<NaiveDate>,
}

pub struct PdfWriter;

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// One entry per distinct font handle, in /F0, /F1 order.
    fonts: Vec<FontEntry>,
    /// XObject ids, indexed as /Im0, /Im1, ...
    image_objects: Vec<usize>,
}

struct FontEntry {
    handle: FontHandle,
    obj_id: usize,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(PdfObject { data });
        self.objects.len() - 1
    }

    fn push_stream(&mut self, dict_extra: &str, raw: &[u8]) -> usize {
        let compressed = compress_to_vec_zlib(raw, 6);
        let mut data: Vec<u8> = Vec::new();
        let _ = write!(
            data,
            "<< /Length {}{} /Filter /FlateDecode >>\nstream\n",
            compressed.len(),
            dict_extra
        );
        data.extend_from_slice(&compressed);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }

    /// Resource index (/F<n>) of a registered font handle.
    fn font_index(&self, handle: &FontHandle) -> usize {
        self.fonts
            .iter()
            .position(|f| Arc::ptr_eq(&f.handle, handle))
            .unwrap_or(0)
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write a finished document to a PDF byte vector.
    pub fn write(&self, doc: &RenderedDocument) -> Result<Vec<u8>> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            fonts: Vec::new(),
            image_objects: Vec::new(),
        };

        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        builder.push(Vec::new());
        builder.push(Vec::new());
        builder.push(Vec::new());

        self.register_fonts(&mut builder, doc);
        for image in &doc.resources.images {
            let id = Self::write_image_xobject(&mut builder, image);
            builder.image_objects.push(id);
        }

        let weights = [
            doc.resources.fonts.get(FontWeight::Regular).clone(),
            doc.resources.fonts.get(FontWeight::Bold).clone(),
        ];
        let font_slots = [
            builder.font_index(&weights[0]),
            builder.font_index(&weights[1]),
        ];

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in &doc.pages {
            let content = self.build_content_stream(page, &builder, &font_slots);
            let content_obj_id = builder.push_stream("", content.as_bytes());

            let font_resources = self.build_font_resource_dict(&builder);
            let xobject_resources = self.build_xobject_resource_dict(page, &builder);
            let resources = if xobject_resources.is_empty() {
                format!("/Font << {} >>", font_resources)
            } else {
                format!(
                    "/Font << {} >> /XObject << {} >>",
                    font_resources, xobject_resources
                )
            };
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.width, page.height, content_obj_id, resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info = Self::build_info_dict(&doc.metadata);
        let info_obj_id = builder.push(info.into_bytes());

        log::debug!(
            "serialised {} page(s), {} font(s), {} image(s)",
            doc.pages.len(),
            builder.fonts.len(),
            builder.image_objects.len()
        );
        Ok(self.serialize(&builder, info_obj_id))
    }

    fn build_info_dict(metadata: &Metadata) -> String {
        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title ({}) ", Self::escape_pdf_string(title));
        }
        if let Some(ref author) = metadata.author {
            let _ = write!(info, "/Author ({}) ", Self::escape_pdf_string(author));
        }
        if let Some(ref subject) = metadata.subject {
            let _ = write!(info, "/Subject ({}) ", Self::escape_pdf_string(subject));
        }
        if let Some(date) = metadata.creation_date {
            let _ = write!(info, "/CreationDate (D:{}000000Z) ", date.format("%Y%m%d"));
        }
        let _ = write!(info, "/Producer ({}) >>", PRODUCER);
        info
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(&self, page: &Page, builder: &PdfBuilder, font_slots: &[usize; 2]) -> String {
        let mut stream = String::new();
        for command in &page.commands {
            match command {
                DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                    stroke,
                } => {
                    if let Some(bg) = fill {
                        let _ = write!(stream, "q\n{} rg\n", Self::color_operands(bg));
                        let _ = write!(stream, "{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n", x, y, width, height);
                    }
                    if let Some(stroke) = stroke {
                        let _ = write!(
                            stream,
                            "q\n{} RG\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ\n",
                            Self::color_operands(&stroke.color),
                            stroke.width,
                            x,
                            y,
                            width,
                            height
                        );
                    }
                }

                DrawCommand::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    stroke,
                } => {
                    let _ = write!(
                        stream,
                        "q\n{} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                        Self::color_operands(&stroke.color),
                        stroke.width,
                        x1,
                        y1,
                        x2,
                        y2
                    );
                }

                DrawCommand::Text {
                    x,
                    y,
                    text,
                    weight,
                    size,
                    color,
                } => {
                    let slot = match weight {
                        FontWeight::Regular => font_slots[0],
                        FontWeight::Bold => font_slots[1],
                    };
                    let _ = write!(
                        stream,
                        "BT\n{} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n",
                        Self::color_operands(color),
                        slot,
                        size,
                        x,
                        y
                    );
                    match builder.fonts.get(slot).map(|f| f.handle.as_ref()) {
                        Some(FontData::Custom(font)) => {
                            let _ = write!(stream, "<{}> Tj\n", Self::encode_glyphs(font, text));
                        }
                        _ => {
                            let _ = write!(stream, "({}) Tj\n", Self::encode_winansi(text));
                        }
                    }
                    stream.push_str("ET\n");
                }

                DrawCommand::Image {
                    x,
                    y,
                    width,
                    height,
                    image,
                } => {
                    if *image < builder.image_objects.len() {
                        let _ = write!(
                            stream,
                            "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
                            width, height, x, y, image
                        );
                    } else {
                        // Unknown image: grey placeholder
                        let _ = write!(
                            stream,
                            "q\n0.9 0.9 0.9 rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                            x, y, width, height
                        );
                    }
                }
            }
        }
        stream
    }

    fn color_operands(c: &Color) -> String {
        format!("{:.3} {:.3} {:.3}", c.r, c.g, c.b)
    }

    /// Literal-string body for a standard font. Characters outside
    /// WinAnsiEncoding become `?`.
    fn encode_winansi(text: &str) -> String {
        let mut out = String::new();
        for ch in text.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                _ => {
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// Hex glyph ids for an Identity-H font. Missing glyphs map to .notdef.
    fn encode_glyphs(font: &CustomFont, text: &str) -> String {
        let mut hex = String::new();
        for ch in text.chars() {
            let gid = font.metrics.glyph_ids.get(&ch).copied().unwrap_or(0);
            let _ = write!(hex, "{:04X}", gid);
        }
        hex
    }

    /// Register each distinct font handle once, regular first.
    fn register_fonts(&self, builder: &mut PdfBuilder, doc: &RenderedDocument) {
        let mut used: BTreeMap<FontWeight, BTreeSet<char>> = BTreeMap::new();
        for page in &doc.pages {
            for command in &page.commands {
                if let DrawCommand::Text { text, weight, .. } = command {
                    used.entry(*weight).or_default().extend(text.chars());
                }
            }
        }

        for weight in [FontWeight::Regular, FontWeight::Bold] {
            let handle = doc.resources.fonts.get(weight).clone();
            if builder.fonts.iter().any(|f| Arc::ptr_eq(&f.handle, &handle)) {
                continue;
            }
            let obj_id = match handle.as_ref() {
                FontData::Standard(std_font) => {
                    let font_dict = format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        std_font.pdf_name()
                    );
                    builder.push(font_dict.into_bytes())
                }
                FontData::Custom(font) => {
                    // A face shared by both weights must cover both character sets.
                    let shared = Arc::ptr_eq(
                        doc.resources.fonts.get(FontWeight::Regular),
                        doc.resources.fonts.get(FontWeight::Bold),
                    );
                    let mut chars: BTreeSet<char> = used.get(&weight).cloned().unwrap_or_default();
                    if shared {
                        chars.extend(used.values().flatten().copied());
                    }
                    Self::write_custom_font_objects(builder, font, weight, &chars)
                }
            };
            builder.fonts.push(FontEntry { handle, obj_id });
        }
    }

    /// Write a single image as one or two XObject PDF objects.
    /// Returns the main XObject ID.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let color_space_str = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                };

                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace {} \
                     /BitsPerComponent 8 \
                     /Filter /DCTDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    color_space_str,
                    data.len()
                );
                obj_data.extend_from_slice(data);
                obj_data.extend_from_slice(b"\nendstream");
                builder.push(obj_data)
            }

            ImagePixelData::Decoded { rgb, alpha } => {
                let smask_id = alpha.as_ref().map(|alpha_data| {
                    let dict = format!(
                        " /Type /XObject /Subtype /Image /Width {} /Height {} \
                         /ColorSpace /DeviceGray /BitsPerComponent 8",
                        image.width_px, image.height_px
                    );
                    builder.push_stream(&dict, alpha_data)
                });

                let smask_ref = smask_id
                    .map(|id| format!(" /SMask {} 0 R", id))
                    .unwrap_or_default();
                let dict = format!(
                    " /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceRGB /BitsPerComponent 8{}",
                    image.width_px, image.height_px, smask_ref
                );
                builder.push_stream(&dict, rgb)
            }
        }
    }

    /// /XObject entries for the images a page draws.
    fn build_xobject_resource_dict(&self, page: &Page, builder: &PdfBuilder) -> String {
        let used: BTreeSet<usize> = page
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { image, .. } => Some(*image),
                _ => None,
            })
            .filter(|idx| *idx < builder.image_objects.len())
            .collect();
        used.iter()
            .map(|idx| format!("/Im{} {} 0 R", idx, builder.image_objects[*idx]))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Write the 5 CIDFont PDF objects for a custom TrueType font.
    /// Returns the object ID of the Type0 root font dictionary.
    fn write_custom_font_objects(
        builder: &mut PdfBuilder,
        font: &CustomFont,
        weight: FontWeight,
        used_chars: &BTreeSet<char>,
    ) -> usize {
        let metrics = &font.metrics;
        let scale = 1000.0 / metrics.units_per_em as f64;
        let pdf_font_name = &font.name;

        // 1. FontFile2 stream: the whole TTF, compressed
        let fontfile2_id = builder.push_stream(&format!(" /Length1 {}", font.data.len()), &font.data);

        // 2. FontDescriptor
        let (x_min, y_min, x_max, y_max) = metrics.bbox;
        let bbox_str = format!(
            "[{} {} {} {}]",
            (x_min as f64 * scale) as i32,
            (y_min as f64 * scale) as i32,
            (x_max as f64 * scale) as i32,
            (y_max as f64 * scale) as i32,
        );
        let stem_v = if weight == FontWeight::Bold { 120 } else { 80 };
        let font_descriptor_dict = format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags 4 \
             /FontBBox {} /ItalicAngle 0 \
             /Ascent {} /Descent {} /CapHeight {} /StemV {} \
             /FontFile2 {} 0 R >>",
            pdf_font_name,
            bbox_str,
            (metrics.ascender as f64 * scale) as i32,
            (metrics.descender as f64 * scale) as i32,
            (metrics.cap_height as f64 * scale) as i32,
            stem_v,
            fontfile2_id,
        );
        let font_descriptor_id = builder.push(font_descriptor_dict.into_bytes());

        // 3. CIDFont dictionary (DescendantFont)
        let glyphs: Vec<(char, u16)> = used_chars
            .iter()
            .filter_map(|ch| metrics.glyph_ids.get(ch).map(|gid| (*ch, *gid)))
            .collect();
        let widths: Vec<(u16, u32)> = glyphs
            .iter()
            .map(|(ch, gid)| {
                let advance = metrics.advance_widths.get(ch).copied().unwrap_or(metrics.default_advance);
                (*gid, (advance as f64 * scale) as u32)
            })
            .collect();
        let w_array = Self::build_w_array(&widths);
        let default_width = (metrics.default_advance as f64 * scale) as u32;
        let cidfont_dict = format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /DW {} /W {} \
             /CIDToGIDMap /Identity >>",
            pdf_font_name, font_descriptor_id, default_width, w_array,
        );
        let cidfont_id = builder.push(cidfont_dict.into_bytes());

        // 4. ToUnicode CMap
        let cmap_content = Self::build_tounicode_cmap(&glyphs, pdf_font_name);
        let tounicode_id = builder.push_stream("", cmap_content.as_bytes());

        // 5. Type0 font dictionary (the root, referenced by /Resources)
        let type0_dict = format!(
            "<< /Type /Font /Subtype /Type0 /BaseFont /{} \
             /Encoding /Identity-H \
             /DescendantFonts [{} 0 R] \
             /ToUnicode {} 0 R >>",
            pdf_font_name, cidfont_id, tounicode_id,
        );
        builder.push(type0_dict.into_bytes())
    }

    /// Build the /W array for per-glyph widths in a CIDFont.
    /// Format: [gid [width] gid [width] ...]
    fn build_w_array(widths: &[(u16, u32)]) -> String {
        let mut entries: Vec<(u16, u32)> = widths.to_vec();
        entries.sort_by_key(|(gid, _)| *gid);
        entries.dedup_by_key(|(gid, _)| *gid);

        let mut result = String::from("[");
        for (gid, width) in &entries {
            let _ = write!(result, " {} [{}]", gid, width);
        }
        result.push_str(" ]");
        result
    }

    /// Build a ToUnicode CMap so text can be extracted and copied.
    fn build_tounicode_cmap(glyphs: &[(char, u16)], font_name: &str) -> String {
        let mut gid_to_unicode: Vec<(u16, u32)> =
            glyphs.iter().map(|&(ch, gid)| (gid, ch as u32)).collect();
        gid_to_unicode.sort_unstable();
        gid_to_unicode.dedup_by_key(|(gid, _)| *gid);

        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo\n");
        cmap.push_str("<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        let _ = writeln!(cmap, "/CMapName /{}-UTF16 def", font_name);
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        // beginbfchar blocks hold at most 100 entries
        for chunk in gid_to_unicode.chunks(100) {
            let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
            for &(gid, unicode) in chunk {
                let _ = writeln!(cmap, "<{:04X}> <{}>", gid, Self::utf16_hex(unicode));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");
        cmap
    }

    fn utf16_hex(codepoint: u32) -> String {
        let Some(ch) = char::from_u32(codepoint) else {
            return "FFFD".to_string();
        };
        let mut buf = [0u16; 2];
        ch.encode_utf16(&mut buf)
            .iter()
            .map(|unit| format!("{:04X}", unit))
            .collect()
    }

    fn build_font_resource_dict(&self, builder: &PdfBuilder) -> String {
        builder
            .fonts
            .iter()
            .enumerate()
            .map(|(i, f)| format!("/F{} {} 0 R", i, f.obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// holds the smart quotes, bullets and dashes.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89),
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98),
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );
        output
    }
}
