use super::Project;
use crate::bus::BusClient;
use crate::error::Result;
use std::rc::Rc;

/// Opens, creates and saves projects.
///
/// Kdenlive has no project database, so the folder navigation calls only ever see the project
/// that is currently open.
#[derive(Debug, Clone)]
pub struct ProjectManager {
    client: Rc<BusClient>,
}

impl ProjectManager {
    pub(crate) fn new(client: Rc<BusClient>) -> Self {
        Self { client }
    }

    /// Start a new project with default settings.
    pub fn create_project(&self, name: &str) -> Result<Option<Project>> {
        let created = self.client.new_project(name)?;
        Ok((!created.is_empty()).then(|| self.get_current_project()))
    }

    /// Open a `.kdenlive` file, retrying while Kdenlive finishes starting up.
    pub fn load_project(&self, file_path: &str) -> Result<Option<Project>> {
        let opened = self.client.open_project(file_path)?;
        Ok(opened.then(|| self.get_current_project()))
    }

    pub fn save_project(&self) -> Result<bool> {
        self.client.save_project()
    }

    pub fn get_current_project(&self) -> Project {
        Project::new(self.client.clone())
    }

    /// The open project's name, as the only entry of the "current folder".
    pub fn get_project_list_in_current_folder(&self) -> Result<Vec<String>> {
        let name = self.client.get_project_name()?;
        Ok(if name.is_empty() { Vec::new() } else { vec![name] })
    }

    pub fn get_folder_list_in_current_folder(&self) -> Vec<String> {
        Vec::new()
    }

    pub fn open_folder(&self, _folder_name: &str) -> bool {
        false
    }

    pub fn goto_parent_folder(&self) -> bool {
        true
    }

    pub fn goto_root_folder(&self) -> bool {
        true
    }

    pub fn close_project(&self, _project: &Project) -> bool {
        true
    }
}
