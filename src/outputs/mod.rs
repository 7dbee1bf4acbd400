//! Output generation for the digest.
//!
//! # Submodules
//!
//! - [`html`]: renders article fragments and wraps them into the email document
//!
//! # Output Structure
//!
//! ```text
//! Subject: AI & Tech News Digest – May 05, 2025
//!
//! <html>
//!   <body>
//!     <h2>Top AI/Tech News for May 05, 2025</h2>
//!     <p><strong>title</strong><br>description<br><a href='url'>Read more</a></p>
//!     ...up to 15 fragments...
//!     <hr>
//!     <p style='font-size:12px;'>footer</p>
//!   </body>
//! </html>
//! ```

pub mod html;
