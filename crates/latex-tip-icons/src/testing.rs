//! Synthetic icon fonts and collections for tests.
//!
//! [`TestFont`] assembles a minimal but valid TrueType binary (`cmap`,
//! `glyf`, `head`, `hhea`, `hmtx`, `loca`, `maxp`) whose glyphs are plain
//! rectangles, so tests can exercise cmap filtering and rasterization without
//! shipping binary fixtures.

use std::path::Path;

/// Units per em of every generated font.
pub const UNITS_PER_EM: u16 = 1000;

const ASCENDER: i16 = 900;
const DESCENDER: i16 = -100;

#[derive(Debug, Clone)]
struct RectGlyph {
    character: char,
    width: u16,
    height: u16,
    advance: u16,
    unicode: bool,
}

/// Builder for a rectangle-glyph TrueType font.
#[derive(Debug, Clone, Default)]
pub struct TestFont {
    glyphs: Vec<RectGlyph>,
}

impl TestFont {
    /// Start an empty font (only `.notdef`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a square glyph of side `size` with a one-em advance.
    #[must_use]
    pub fn square(self, character: char, size: u16) -> Self {
        self.glyph(character, size, size, UNITS_PER_EM)
    }

    /// Add a rectangle glyph with explicit ink size and advance.
    #[must_use]
    pub fn glyph(mut self, character: char, width: u16, height: u16, advance: u16) -> Self {
        self.glyphs.push(RectGlyph {
            character,
            width,
            height,
            advance,
            unicode: true,
        });
        self
    }

    /// Add a glyph reachable only through a Windows Symbol cmap subtable.
    #[must_use]
    pub fn symbol_glyph(mut self, character: char, size: u16) -> Self {
        self.glyphs.push(RectGlyph {
            character,
            width: size,
            height: size,
            advance: UNITS_PER_EM,
            unicode: false,
        });
        self
    }

    /// Serialize the font.
    pub fn build(&self) -> Vec<u8> {
        let num_glyphs = (self.glyphs.len() + 1) as u16;

        // glyf + loca (long offsets); glyph 0 is an empty .notdef.
        let mut glyf = Vec::new();
        let mut loca = vec![0u32, 0u32];
        for glyph in &self.glyphs {
            let x0 = glyph.advance.saturating_sub(glyph.width) as i16 / 2;
            let x1 = x0 + glyph.width as i16;
            let (y0, y1) = (0i16, glyph.height as i16);

            push_i16(&mut glyf, 1); // contours
            push_i16(&mut glyf, x0);
            push_i16(&mut glyf, y0);
            push_i16(&mut glyf, x1);
            push_i16(&mut glyf, y1);
            push_u16(&mut glyf, 3); // end point of contour 0
            push_u16(&mut glyf, 0); // no instructions
            glyf.extend_from_slice(&[0x01; 4]); // on-curve, full-width deltas
            for dx in [x0, 0, x1 - x0, 0] {
                push_i16(&mut glyf, dx);
            }
            for dy in [y0, y1 - y0, 0, y0 - y1] {
                push_i16(&mut glyf, dy);
            }
            loca.push(glyf.len() as u32);
        }
        let loca: Vec<u8> = loca.iter().flat_map(|o| o.to_be_bytes()).collect();

        let mut hmtx = Vec::new();
        push_u16(&mut hmtx, UNITS_PER_EM);
        push_i16(&mut hmtx, 0);
        for glyph in &self.glyphs {
            push_u16(&mut hmtx, glyph.advance);
            push_i16(&mut hmtx, glyph.advance.saturating_sub(glyph.width) as i16 / 2);
        }

        let max_advance = self
            .glyphs
            .iter()
            .map(|g| g.advance)
            .chain([UNITS_PER_EM])
            .max()
            .unwrap_or(UNITS_PER_EM);

        let mut head = Vec::new();
        push_u32(&mut head, 0x0001_0000); // version
        push_u32(&mut head, 0x0001_0000); // font revision
        push_u32(&mut head, 0); // checksum adjustment
        push_u32(&mut head, 0x5F0F_3CF5); // magic
        push_u16(&mut head, 0); // flags
        push_u16(&mut head, UNITS_PER_EM);
        head.extend_from_slice(&[0; 16]); // created + modified
        push_i16(&mut head, 0);
        push_i16(&mut head, DESCENDER);
        push_i16(&mut head, max_advance as i16);
        push_i16(&mut head, ASCENDER);
        push_u16(&mut head, 0); // mac style
        push_u16(&mut head, 8); // lowest rec ppem
        push_i16(&mut head, 2); // direction hint
        push_i16(&mut head, 1); // long loca
        push_i16(&mut head, 0); // glyph data format

        let mut hhea = Vec::new();
        push_u32(&mut hhea, 0x0001_0000);
        push_i16(&mut hhea, ASCENDER);
        push_i16(&mut hhea, DESCENDER);
        push_i16(&mut hhea, 0); // line gap
        push_u16(&mut hhea, max_advance);
        push_i16(&mut hhea, 0); // min lsb
        push_i16(&mut hhea, 0); // min rsb
        push_i16(&mut hhea, max_advance as i16); // x max extent
        push_i16(&mut hhea, 1); // caret slope rise
        push_i16(&mut hhea, 0); // caret slope run
        push_i16(&mut hhea, 0); // caret offset
        hhea.extend_from_slice(&[0; 8]); // reserved
        push_i16(&mut hhea, 0); // metric data format
        push_u16(&mut hhea, num_glyphs);

        let mut maxp = Vec::new();
        push_u32(&mut maxp, 0x0000_5000);
        push_u16(&mut maxp, num_glyphs);

        let cmap = self.cmap();

        let tables: [(&[u8; 4], &[u8]); 7] = [
            (b"cmap", &cmap),
            (b"glyf", &glyf),
            (b"head", &head),
            (b"hhea", &hhea),
            (b"hmtx", &hmtx),
            (b"loca", &loca),
            (b"maxp", &maxp),
        ];
        assemble(&tables)
    }

    fn cmap(&self) -> Vec<u8> {
        let groups = |unicode: bool| -> Vec<(u32, u32)> {
            let mut groups: Vec<(u32, u32)> = self
                .glyphs
                .iter()
                .enumerate()
                .filter(|(_, g)| g.unicode == unicode)
                .map(|(i, g)| (u32::from(g.character), i as u32 + 1))
                .collect();
            groups.sort_unstable();
            groups
        };
        // (platform, encoding, groups)
        let subtables = [(0u16, 4u16, groups(true)), (3, 0, groups(false))];

        let mut header = Vec::new();
        push_u16(&mut header, 0);
        push_u16(&mut header, subtables.len() as u16);

        let mut body = Vec::new();
        let body_start = 4 + 8 * subtables.len() as u32;
        for (platform, encoding, groups) in &subtables {
            push_u16(&mut header, *platform);
            push_u16(&mut header, *encoding);
            push_u32(&mut header, body_start + body.len() as u32);

            push_u16(&mut body, 12); // format
            push_u16(&mut body, 0); // reserved
            push_u32(&mut body, 16 + 12 * groups.len() as u32);
            push_u32(&mut body, 0); // language
            push_u32(&mut body, groups.len() as u32);
            for (code_point, glyph_id) in groups {
                push_u32(&mut body, *code_point);
                push_u32(&mut body, *code_point);
                push_u32(&mut body, *glyph_id);
            }
        }
        header.extend(body);
        header
    }
}

/// Write `<dir>/<collection>/<css_file>` and `<dir>/<collection>/<font_file>`.
pub fn write_collection(
    dir: &Path,
    collection: &str,
    css_file: &str,
    css: &str,
    font_file: &str,
    font: &TestFont,
) -> std::io::Result<()> {
    let collection_dir = dir.join(collection);
    std::fs::create_dir_all(&collection_dir)?;
    std::fs::write(collection_dir.join(css_file), css)?;
    std::fs::write(collection_dir.join(font_file), font.build())
}

/// Stylesheet used by [`write_fontawesome`].
pub const FONTAWESOME_CSS: &str = r#"
@font-face {
  font-family: "Font Awesome 5 Free";
  src: url("../webfonts/fa-solid-900.woff2") format("woff2");
}
.fa, .fas { font-family: "Font Awesome 5 Free"; }
.fa-comments:before { content: "\f086"; }
.fa-exclamation-circle:before { content: "\f06a"; }
.fa-user:before,
.fa-person:before { content: "\f007"; }
.fa-file-alt::before { content: '\f15c'; }
.fa-balance-scale:before { content: "\f24e"; }
.sr-only { position: absolute; }
"#;

/// Stylesheet used by [`write_fontawesome`] for brand icons.
pub const BRANDS_CSS: &str = r#"
.fa-github:before { content: "\f09b"; }
.fa-rust:before { content: "\e07a"; }
"#;

/// Write a small stand-in for the core fontawesome collection.
///
/// The solid font maps every stylesheet glyph; the regular font only maps
/// `comments`, `user` and `file-alt`, like the real variant fonts do.
pub fn write_fontawesome(data_dir: &Path) -> std::io::Result<()> {
    let solid = TestFont::new()
        .square('\u{f086}', 800)
        .square('\u{f06a}', 900)
        .square('\u{f007}', 700)
        .glyph('\u{f15c}', 600, 800, 750)
        .glyph('\u{f24e}', 1200, 700, 1100);
    let regular = TestFont::new()
        .square('\u{f086}', 780)
        .square('\u{f007}', 680)
        .glyph('\u{f15c}', 580, 780, 750);
    let brands = TestFont::new().square('\u{f09b}', 850);

    write_collection(
        data_dir,
        "fontawesome",
        "fontawesome.css",
        FONTAWESOME_CSS,
        "fa-solid-900.ttf",
        &solid,
    )?;
    let dir = data_dir.join("fontawesome");
    std::fs::write(dir.join("fa-regular-400.ttf"), regular.build())?;
    std::fs::write(dir.join("brands.css"), BRANDS_CSS)?;
    std::fs::write(dir.join("fa-brands-400.ttf"), brands.build())
}

fn assemble(tables: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut entry_selector = 0u16;
    while (1u16 << (entry_selector + 1)) <= num_tables {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector) * 16;

    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u16(&mut out, num_tables);
    push_u16(&mut out, search_range);
    push_u16(&mut out, entry_selector);
    push_u16(&mut out, num_tables * 16 - search_range);

    let mut offset = 12 + 16 * tables.len() as u32;
    let mut data = Vec::new();
    for (tag, table) in tables {
        out.extend_from_slice(*tag);
        push_u32(&mut out, 0); // checksum, not verified by parsers we use
        push_u32(&mut out, offset);
        push_u32(&mut out, table.len() as u32);

        data.extend_from_slice(table);
        while data.len() % 4 != 0 {
            data.push(0);
        }
        offset = 12 + 16 * tables.len() as u32 + data.len() as u32;
    }
    out.extend(data);
    out
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_i16(buf: &mut Vec<u8>, value: i16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}
