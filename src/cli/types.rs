//! Types command handler.

use color_eyre::Result;

use crate::models::BaseKind;

use super::App;

impl App {
    /// List base kinds and registered types with their storage.
    pub fn run_types(&self) -> Result<()> {
        let ctx = self.load_context()?;
        for kind in BaseKind::all() {
            println!("{:<12} text (base kind)", kind.as_str());
        }
        for type_ref in ctx.registry.iter() {
            println!("{:<12} {}", type_ref.name, type_ref.storage);
        }
        Ok(())
    }
}
