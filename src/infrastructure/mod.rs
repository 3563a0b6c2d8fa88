// Infrastructure layer module
// Store adapters behind the domain repository ports

pub mod repositories;
