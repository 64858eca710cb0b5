pub mod collector;
pub mod consistency;
pub mod pointer_cache;
pub mod polymorphic;

pub use collector::{collect, collect_entity, ActiveRelation, CollectContext, DragSide, ReassignRelation};
pub use consistency::{find_problems, ProblemKind, ProblemRelation};
pub use polymorphic::{change_is_polymorphic_list, resolve_for_polymorphic_entity};
