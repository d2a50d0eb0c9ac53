/// The whole `clientes` collection. Invalidated by every customer write.
pub const ALL_CLIENTES: &str = "all_clientes";
