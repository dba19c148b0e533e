use schema_probe::resources::EmbeddedResources;
use schema_probe::user_info;
use schema_probe::utils::error::AnyResult;

/// Liste les schémas embarqués dans le binaire, un chemin logique par ligne.
/// Le décompte part sur stderr : stdout ne contient que les chemins.
pub fn handle() -> AnyResult<()> {
    let names = EmbeddedResources::bundled().list();
    for name in &names {
        println!("{}", name);
    }
    user_info!("PROBE_LIST", "📦 {} schéma(s) embarqué(s)", names.len());
    Ok(())
}
