use crate::core::errors::Result;
use crate::core::models::change::RowChange;
use crate::core::traits::naming::SchemaNaming;

/// Port for rendering a resolved row change into one log line.
///
/// Implementations own the textual format entirely; the logger treats the
/// returned string as opaque. Display names come from the `naming`
/// collaborator so one formatter can serve differently labeled schemas.
pub trait ChangeFormatter {
    fn format(&self, change: &RowChange, naming: &dyn SchemaNaming) -> Result<String>;
}
