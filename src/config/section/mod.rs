//! Configuration section definitions.
//!
//! Each module corresponds to a section in `regionlink.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `site`     | `[site]`       | Site origin                          |
//! | `sitemap`  | `[sitemap]`    | Sitemap source and cache freshness   |
//! | `storage`  | `[storage]`    | Durable storage directory            |
//! | `localize` | `[localize]`   | Content directory and link scope     |

mod localize;
mod site;
mod sitemap;
mod storage;

pub use localize::LocalizeConfig;
pub use site::SiteConfig;
pub use sitemap::SitemapConfig;
pub use storage::StorageConfig;
