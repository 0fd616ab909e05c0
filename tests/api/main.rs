mod test_send_emails;
