pub mod badges;
pub mod guard;
pub mod reconcile;
