//! # Kumitate - Workflow Graph Model
//!
//! **Kumitate** is the in-memory model behind a visual workflow editor. It holds a
//! directed graph of typed nodes joined by connections, keeps that graph consistent
//! while it is edited, stamps out new graphs from templates and reports structural
//! problems with optional one-click fixes.
//!
//! ## Core Workflow
//!
//! 1.  **Describe Node Types**: The `NodeCatalog` maps every node-type tag to its ports, default configuration and display metadata. Aliases let graphs from other editors use their own tags.
//! 2.  **Build or Load a Graph**: Edit a graph through a `GraphStore`, instantiate one from a `TemplateRegistry` with the `TemplateLoader`, or load serialized JSON through the `IntoGraph` trait.
//! 3.  **Validate**: Run the `Validator` to get an ordered list of `ValidationIssue`s. Fixable issues carry an `IssueFix` that the validator applies through the store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kumitate::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let catalog = NodeCatalog::new();
//!
//!     // Start from a built-in template.
//!     let registry = TemplateRegistry::builtin();
//!     let loader = TemplateLoader::new(&catalog, &registry);
//!     let graph = loader.instantiate("simple_chat")?;
//!
//!     // Keep editing it.
//!     let mut store = GraphStore::builder(&catalog).graph(graph).build();
//!     let mail = store.add_node("email_send", Position::new(600.0, 350.0))?;
//!     println!("Added '{}'", mail.id);
//!
//!     // The new node is neither connected nor able to reach an end node.
//!     let validator = Validator::new(&catalog);
//!     for issue in validator.validate(store.graph()) {
//!         println!("[{:?}] {}", issue.severity, issue.message);
//!     }
//!
//!     println!("{}", store.graph().to_json()?);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod ids;
pub mod model;
pub mod prelude;
pub mod store;
pub mod template;
pub mod validator;
