/// Data layer: scene types, loading, filtering and output.
///
/// Architecture:
/// ```text
///  metadata .csv / .csv.gz
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → SceneTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria steps, in fixed order → narrowed SceneTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  entity IDs, one per line
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod writer;
