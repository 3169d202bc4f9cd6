use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use std::io::Write;

impl Repository {
    pub fn status(&self) -> anyhow::Result<StatusInfo> {
        let status_info = Status::new(self).initialize()?;

        self.print_branches(&status_info)?;
        self.print_section("Staged Files", status_info.staged_files.iter())?;
        self.print_section("Removed Files", status_info.removed_files.iter())?;
        self.print_section(
            "Modifications Not Staged For Commit",
            status_info
                .workspace_changeset
                .iter()
                .map(|(path, change)| format!("{} {}", path, change)),
        )?;
        self.print_section("Untracked Files", status_info.untracked_files.iter())?;

        Ok(status_info)
    }

    fn print_branches(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        self.print_section(
            "Branches",
            status_info.branches.iter().map(|branch| {
                if branch == &status_info.current_branch {
                    format!("*{}", branch)
                } else {
                    branch.to_string()
                }
            }),
        )
    }

    fn print_section<T: std::fmt::Display>(
        &self,
        title: &str,
        lines: impl Iterator<Item = T>,
    ) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "=== {} ===", title)?;
        for line in lines {
            writeln!(writer, "{}", line)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
