//! # cvpress
//!
//! A local-first résumé builder. CVs are structured records kept in a single
//! JSON blob on disk; any of them can be previewed as HTML or exported as a
//! paginated A4 PDF.
//!
//! # Architecture: Record → Markup → Bitmap → Pages
//!
//! ```text
//! 1. Store      cvpress_cvs.json  →  Cv            (load, edit, save)
//! 2. Render     Cv + locale       →  HTML          (maud, pure)
//! 3. Rasterize  HTML              →  RGB bitmap    (headless Chrome, 2× scale)
//! 4. Paginate   bitmap height     →  placements    (pure arithmetic)
//! 5. Assemble   bitmap + pages    →  PDF bytes     (lopdf)
//! ```
//!
//! Rendering and pagination are pure functions and carry most of the tests.
//! The two impure steps sit behind seams: [`store::KeyValueStore`] for
//! persistence and [`export::Rasterizer`] for the browser engine, each with an
//! in-memory stand-in for tests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | The CV record, list-entry ordering, mutation helpers |
//! | [`sections`] | Per-section completion status (guidance, never blocking) |
//! | [`store`] | CV collection over a key-value backend; corrupt data reads as empty |
//! | [`render`] | CV + locale → self-contained HTML document using Maud |
//! | [`export`] | Rasterize, paginate and assemble the PDF; safe download names |
//! | [`photo`] | Profile photo crop: drag clamping, crop, resize, JPEG data URI |
//! | [`config`] | `config.toml` loading, merging with stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Ordering Keys
//!
//! Experience, education, certification and language entries carry an integer
//! `order`. Array position is never trusted; every consumer sorts by `order`
//! (stable) before display, and reordering swaps keys between neighbours.
//!
//! ## Image-Based PDF
//!
//! The PDF is a picture of the rendered page, not reflowed text. Whatever the
//! preview shows is exactly what prints, Hangul included, with no font
//! embedding. The cost is that text in the PDF is not selectable.
//!
//! ## Trailing Page Rule
//!
//! Pagination keeps adding pages while the remaining height is `>= 0`, so a
//! document that is an exact multiple of the page height gets one blank
//! trailing page. That is the default, for output identical to earlier
//! exports; `export.trailing_page = "trim"` switches to `> 0`.
//!
//! ## Resilient Storage
//!
//! A store that cannot be read or parsed is treated as empty and logged,
//! never surfaced as an error. Saves go through a temp file and rename so a
//! crash mid-write cannot tear the blob.

pub mod config;
pub mod export;
pub mod model;
pub mod output;
pub mod photo;
pub mod render;
pub mod sections;
pub mod store;
