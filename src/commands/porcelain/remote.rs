use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::RemoteName;
use crate::errors::TwigError;

impl Repository {
    /// Record another store under a name
    ///
    /// `location` is the path of the other store's directory, absolute or
    /// relative to this working tree, e.g. `../other/.twig`.
    pub fn add_remote(&self, name: &str, location: &str) -> anyhow::Result<()> {
        let name = RemoteName::try_parse(name)?;

        self.remotes().add(&name, location)
    }

    pub fn rm_remote(&self, name: &str) -> anyhow::Result<()> {
        let name = RemoteName::try_parse(name).map_err(|_| TwigError::UnknownRemote)?;

        self.remotes().remove(&name)
    }
}
