//! # EBU-TT-D Processor: A Streaming Parser for EBU-TT-D Subtitle Documents
//!
//! This crate provides a strict, high-performance parser for EBU-TT-D
//! (EBU Timed Text, Distribution profile) subtitle documents, the TTML-based
//! format used for broadcast and streaming subtitle delivery. It reads a
//! document in a single streaming pass and produces a fully resolved
//! [`model::Document`]: style references are cascaded, inheritance is
//! applied, and every relative unit (cell- and percentage-based font sizes,
//! line heights, line padding, text outlines) is converted into an absolute
//! fraction of the rendering canvas. A renderer can consume the result
//! without ever looking at a style table.
//!
//! The entry point is [`parse_ebuttd`].
//!
//! ## ⚠️ Important: Strict by Design
//!
//! Parsing is all-or-nothing. The first constraint violation (a missing
//! required element, a dangling style reference, a malformed timecode)
//! aborts the parse with a [`ParseError`]; no partial document is returned.
//! This library targets the EBU-TT-D distribution profile specifically, not
//! generic TTML.
//!
//! ## Examples
//!
//! ```rust
//! use ebuttd_processor::parse_ebuttd;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let content = r##"
//!     <tt xmlns="http://www.w3.org/ns/ttml" ttp:timeBase="media" xml:lang="en">
//!       <head>
//!         <styling>
//!           <style xml:id="s1" tts:fontSize="80%" tts:color="#FFFFFFFF"/>
//!         </styling>
//!         <layout>
//!           <region xml:id="r1" tts:origin="10% 80%" tts:extent="80% 15%"/>
//!         </layout>
//!       </head>
//!       <body>
//!         <div region="r1">
//!           <p xml:id="p1" begin="00:00:01.000" end="00:00:02.000">
//!             <span style="s1">Hello subtitle</span>
//!           </p>
//!         </div>
//!       </body>
//!     </tt>
//!     "##;
//!
//!     let document = parse_ebuttd(content)?;
//!
//!     assert_eq!(document.regions.len(), 1);
//!     let paragraph = &document.body.divs[0].paragraphs[0];
//!     assert_eq!(paragraph.begin_secs, 1.0);
//!
//!     // The span's 80% font size has been resolved against the default
//!     // 32x15 cell grid into an absolute fraction of the canvas height.
//!     let ebuttd_processor::model::InlineContent::Span(span) = &paragraph.contents[0] else {
//!         unreachable!();
//!     };
//!     assert!((span.font_size - 0.8 / 15.0).abs() < 1e-12);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod model;
pub mod parser;

pub use error::{ParseError, ValueError};
pub use parser::parse_ebuttd;
