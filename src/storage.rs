pub mod sorted_keys;
