pub mod louvain;
