mod connection;
mod trie_dict;
