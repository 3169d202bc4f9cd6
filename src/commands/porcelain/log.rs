use crate::areas::repository::Repository;
use crate::artifacts::log::LogEntry;
use crate::artifacts::log::rev_list::RevList;
use std::io::Write;

impl Repository {
    /// History of the current branch along first parents
    pub fn log(&self) -> anyhow::Result<()> {
        let head_oid = self.head_oid()?;

        for entry in RevList::new(self.database(), head_oid) {
            let (commit_oid, commit) = entry?;
            write!(
                self.writer(),
                "{}",
                LogEntry::new(&commit_oid, &commit, self.colorize())
            )?;
        }

        Ok(())
    }

    /// Every stored commit, in id order
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit_oid in self.database().commit_ids()? {
            let commit = self.database().load_commit(&commit_oid)?;
            write!(
                self.writer(),
                "{}",
                LogEntry::new(&commit_oid, &commit, self.colorize())
            )?;
        }

        Ok(())
    }

    /// Ids of every commit with exactly this message
    pub fn find(&self, message: &str) -> anyhow::Result<usize> {
        let mut found = 0;

        for commit_oid in self.database().commit_ids()? {
            if self.database().load_commit(&commit_oid)?.message() == message {
                writeln!(self.writer(), "{}", commit_oid)?;
                found += 1;
            }
        }

        if found == 0 {
            writeln!(self.writer(), "Found no commit with that message.")?;
        }

        Ok(found)
    }
}
