pub mod composite;
pub mod cursor;
pub mod history;
pub mod import;
pub mod keyboard;
pub mod model;
pub mod palette;
pub mod preview;
pub mod render;
pub mod replay;
pub mod save;
pub mod session;
pub mod surface;
pub mod text;

pub use history::DrawHistory;
pub use model::{BrushShape, Color, Point, ShapeKind, Tool};
pub use session::{EraserMode, LeavePolicy, Session, SessionConfig};
pub use surface::{PixelRect, Snapshot, Surface};
