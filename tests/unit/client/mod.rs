mod uploader_test;
