use schemagate_core::db::migrations::current_version;
use schemagate_core::db::open_db;
use std::path::Path;

pub fn init_db(path: &Path) -> anyhow::Result<()> {
    let conn = open_db(path)?;
    println!(
        "{} ready at schema version {}",
        path.display(),
        current_version(&conn)?
    );
    Ok(())
}
