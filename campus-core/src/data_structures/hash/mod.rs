pub mod map_singly_list;
pub mod sep_chain_hash_table;

pub use map_singly_list::{MapSinglyList, SinglyCursor};
pub use sep_chain_hash_table::{
    DEFAULT_CAPACITY, HashEntries, IDEAL_LOAD_FACTOR, MAX_LOAD_FACTOR, SepChainHashTable,
    next_prime,
};
