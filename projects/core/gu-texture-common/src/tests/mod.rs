mod allocation_tests;
