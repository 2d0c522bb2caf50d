use super::Editor;
use crate::error::EditorError;
use crate::model::StageScheme;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl Editor {
    pub fn schemes(&self) -> &[StageScheme] {
        &self.schemes
    }

    pub fn current_scheme(&self) -> Option<&StageScheme> {
        let id = self.current_scheme.as_deref()?;
        self.schemes.iter().find(|s| s.id == id)
    }

    /// Snapshots the current blocks as a new scheme and returns its id.
    ///
    /// The new scheme does not become the active one.
    pub fn create_scheme(&mut self, name: &str, description: Option<&str>) -> String {
        let id = self.fresh_id("scheme");
        self.schemes.push(StageScheme {
            id: id.clone(),
            name: name.to_string(),
            description: description.map(str::to_string),
            logic_blocks: self.blocks.clone(),
            created_at: now_secs(),
        });
        info!(scheme = %id, name, "created scheme");
        id
    }

    /// Writes the current blocks back into the active scheme, if any.
    pub fn save_current_scheme(&mut self) {
        let Some(id) = self.current_scheme.as_deref() else {
            return;
        };
        if let Some(scheme) = self.schemes.iter_mut().find(|s| s.id == id) {
            scheme.logic_blocks = self.blocks.clone();
        }
    }

    /// Saves the active scheme, then loads `scheme_id` into the editor.
    pub fn switch_scheme(&mut self, scheme_id: &str) -> Result<(), EditorError> {
        let index = self.scheme_index(scheme_id)?;
        self.save_current_scheme();

        self.blocks = self.schemes[index].logic_blocks.clone();
        self.current_scheme = Some(scheme_id.to_string());
        self.select_first_stage();
        info!(scheme = %scheme_id, blocks = self.blocks.len(), "switched scheme");
        self.recompile();
        Ok(())
    }

    pub fn rename_scheme(&mut self, scheme_id: &str, name: &str) -> Result<(), EditorError> {
        let index = self.scheme_index(scheme_id)?;
        self.schemes[index].name = name.to_string();
        Ok(())
    }

    /// Duplicates a scheme. Without a name the copy is called `"<name> copy"`.
    pub fn copy_scheme(&mut self, scheme_id: &str, name: Option<&str>) -> Result<String, EditorError> {
        let index = self.scheme_index(scheme_id)?;
        let id = self.fresh_id("scheme");
        let source = &self.schemes[index];
        let copy = StageScheme {
            id: id.clone(),
            name: name
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} copy", source.name)),
            description: source.description.clone(),
            logic_blocks: source.logic_blocks.clone(),
            created_at: now_secs(),
        };
        self.schemes.push(copy);
        info!(scheme = %id, from = %scheme_id, "copied scheme");
        Ok(id)
    }

    /// Deletes a scheme. Deleting the active one switches to the first
    /// remaining scheme, or empties the model when none is left.
    pub fn delete_scheme(&mut self, scheme_id: &str) -> Result<StageScheme, EditorError> {
        let index = self.scheme_index(scheme_id)?;
        let removed = self.schemes.remove(index);
        info!(scheme = %scheme_id, "deleted scheme");

        if self.current_scheme.as_deref() == Some(scheme_id) {
            self.current_scheme = None;
            match self.schemes.first().map(|s| s.id.clone()) {
                Some(next) => self.switch_scheme(&next)?,
                None => {
                    self.blocks.clear();
                    self.selection = None;
                    self.recompile();
                }
            }
        }
        Ok(removed)
    }

    fn scheme_index(&self, scheme_id: &str) -> Result<usize, EditorError> {
        self.schemes
            .iter()
            .position(|s| s.id == scheme_id)
            .ok_or_else(|| EditorError::SchemeNotFound(scheme_id.to_string()))
    }
}
