// Déclaration des modules disponibles dans le CLI
// Chaque module ici correspond à un fichier .rs dans le même dossier

pub mod list;
pub mod probe;
