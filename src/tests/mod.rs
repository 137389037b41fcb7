mod test_registry;
